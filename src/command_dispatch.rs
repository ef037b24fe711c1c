//! Purpose: Hold top-level CLI command dispatch for `recsearch`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: One-shot commands connect only the collections they query.
//! Invariants: Zero matches is a successful run (exit 0, empty `results`).

use super::*;

pub(super) fn dispatch_command(
    command: Command,
    config: &DatasetConfig,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "recsearch", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_version_output();
            Ok(RunOutcome::ok())
        }
        Command::Search {
            collection,
            field,
            value,
            first,
            string,
            json,
        } => {
            let kind = CollectionKind::from(collection);
            let catalog = Catalog::connect_only(config, &[kind])?;
            let db = catalog.handle(kind)?;
            let value = query_value(&value, string);
            let hits = if first {
                db.get(&field, &value)?.into_iter().collect::<Vec<_>>()
            } else {
                db.filter(&field, &value)?
            };

            if !json && io::stdout().is_terminal() {
                let use_color = color_mode.use_color(true);
                println!("{}", render::render_records(&hits, use_color));
            } else {
                emit_json(json!({
                    "collection": kind.name(),
                    "field": field,
                    "value": value.to_json(),
                    "count": hits.len(),
                    "results": hits,
                }));
            }
            Ok(RunOutcome::ok())
        }
        Command::Fields { collection, json } => {
            let kinds = match collection {
                Some(collection) => vec![CollectionKind::from(collection)],
                None => CollectionKind::ALL.to_vec(),
            };
            let catalog = Catalog::connect_only(config, &kinds)?;

            if !json && io::stdout().is_terminal() {
                let use_color = color_mode.use_color(true);
                for kind in catalog.kinds() {
                    let fields = catalog.handle(kind)?.fields()?;
                    println!("{}", render::render_fields(kind, fields, use_color));
                }
            } else {
                let mut listings = Vec::with_capacity(kinds.len());
                for kind in catalog.kinds() {
                    let fields = catalog.handle(kind)?.fields()?;
                    listings.push(json!({ "collection": kind.name(), "fields": fields }));
                }
                match (collection, listings.pop()) {
                    (Some(_), Some(listing)) => emit_json(listing),
                    (_, last) => {
                        listings.extend(last);
                        emit_json(json!({ "collections": listings }));
                    }
                }
            }
            Ok(RunOutcome::ok())
        }
        Command::Shell => {
            let catalog = Catalog::connect(config)?;
            let use_color = color_mode.use_color(io::stdout().is_terminal());
            let stdin = io::stdin();
            let mut session = shell::Shell::new(&catalog, stdin.lock(), io::stdout(), use_color);
            session.run()?;
            Ok(RunOutcome::ok())
        }
    }
}
