//! Purpose: Interactive menu loop for searching the connected collections.
//! Exports: `Shell`, `coerce_input`.
//! Role: Presentation collaborator of the core; turns keystrokes into `filter`/`fields` calls.
//! Invariants: `quit`, the menu's numbered quit entry, or end of input ends the session without error.
//! Invariants: Unknown menu choices are reported and re-prompted, never fatal.
//! Invariants: An unknown field surfaces as the core's `FieldNotFound` and re-prompts the field.
//! Invariants: Only terminal write failures and data errors other than `FieldNotFound` escape.
use std::io::{BufRead, Write};

use recsearch::api::{Catalog, CollectionKind, Error, ErrorKind, ScalarValue};

use crate::render::{render_banner, render_fields, render_menu, render_records};

const QUIT: &str = "quit";
const MAIN_OPTIONS: [&str; 3] = ["Search", "View a list of searchable fields", "Quit"];
// Numbering follows `CollectionKind::ALL`, then the quit entry.
const COLLECTION_OPTIONS: [&str; 4] = ["Users", "Tickets", "Organizations", "Quit"];

enum Input {
    Line(String),
    Quit,
}

pub struct Shell<'a, R, W> {
    catalog: &'a Catalog,
    input: R,
    output: W,
    use_color: bool,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(catalog: &'a Catalog, input: R, output: W, use_color: bool) -> Self {
        Self {
            catalog,
            input,
            output,
            use_color,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn run(&mut self) -> Result<(), Error> {
        let banner = render_banner(
            "Welcome to recsearch",
            &["Type 'quit' to exit at any time, Press 'Enter' to continue"],
            self.use_color,
        );
        self.say(&banner)?;
        if let Input::Quit = self.read()? {
            return Ok(());
        }
        loop {
            let menu = render_menu("Select search options", &MAIN_OPTIONS, self.use_color);
            self.say(&menu)?;
            let choice = match self.read()? {
                Input::Quit => return Ok(()),
                Input::Line(line) => line,
            };
            let keep_going = match choice.trim() {
                "1" => self.search()?,
                "2" => {
                    self.list_fields()?;
                    true
                }
                "3" => false,
                "" => true,
                other => {
                    self.say(&format!("Unknown option `{other}`. Choose 1, 2 or 3."))?;
                    true
                }
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    /// Returns `false` when the operator quit mid-search.
    fn search(&mut self) -> Result<bool, Error> {
        let Some(kind) = self.pick_collection()? else {
            return Ok(false);
        };
        let catalog = self.catalog;
        let db = catalog.handle(kind)?;
        loop {
            self.say("Enter search term")?;
            let field = match self.read()? {
                Input::Quit => return Ok(false),
                Input::Line(line) => line.trim().to_string(),
            };
            self.say("Enter search value")?;
            let value = match self.read()? {
                Input::Quit => return Ok(false),
                Input::Line(line) => coerce_input(&line),
            };
            match db.filter(&field, &value) {
                Ok(hits) => {
                    self.say(&format!("Searching {kind} for {field} with a value of {value}"))?;
                    let text = render_records(&hits, self.use_color);
                    self.say(&text)?;
                    return Ok(true);
                }
                Err(err) if err.kind() == ErrorKind::FieldNotFound => {
                    self.say(&format!(
                        "Unknown field `{field}` for {kind}. Choose option 2 to list searchable fields."
                    ))?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn pick_collection(&mut self) -> Result<Option<CollectionKind>, Error> {
        loop {
            let menu = render_menu("Select a collection", &COLLECTION_OPTIONS, self.use_color);
            self.say(&menu)?;
            let line = match self.read()? {
                Input::Quit => return Ok(None),
                Input::Line(line) => line,
            };
            match line.trim() {
                "1" => return Ok(Some(CollectionKind::Users)),
                "2" => return Ok(Some(CollectionKind::Tickets)),
                "3" => return Ok(Some(CollectionKind::Organizations)),
                "4" => return Ok(None),
                other => self.say(&format!("Unknown collection `{other}`. Choose 1, 2, 3 or 4."))?,
            }
        }
    }

    fn list_fields(&mut self) -> Result<(), Error> {
        let catalog = self.catalog;
        for kind in catalog.kinds() {
            let db = catalog.handle(kind)?;
            let text = render_fields(kind, db.fields()?, self.use_color);
            self.say(&text)?;
        }
        Ok(())
    }

    fn read(&mut self) -> Result<Input, Error> {
        self.output.flush().map_err(terminal_error)?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(terminal_error)?;
        if read == 0 {
            return Ok(Input::Quit);
        }
        let line = line.trim_end_matches(['\n', '\r']).to_string();
        if line.trim() == QUIT {
            return Ok(Input::Quit);
        }
        Ok(Input::Line(line))
    }

    fn say(&mut self, text: &str) -> Result<(), Error> {
        writeln!(self.output, "{text}").map_err(terminal_error)
    }
}

/// Integer-looking input becomes `Int`, exact `true`/`false` become `Bool`, all else stays text.
pub fn coerce_input(raw: &str) -> ScalarValue {
    if let Ok(num) = raw.parse::<i64>() {
        return ScalarValue::Int(num);
    }
    match raw {
        "true" => ScalarValue::Bool(true),
        "false" => ScalarValue::Bool(false),
        _ => ScalarValue::Str(raw.to_string()),
    }
}

fn terminal_error(err: std::io::Error) -> Error {
    Error::new(ErrorKind::Io)
        .with_message("terminal i/o failed")
        .with_source(err)
}
