use std::io::{BufRead, Write};

use hbnb_store::ObjectStore;
use hbnb_types::{Kind, Record, StoreKey, RESERVED_FIELDS};
use tracing::{debug, info};

use crate::coerce::coerce;
use crate::config::{CoercionMode, ConsoleConfig};
use crate::error::ConsoleError;
use crate::help;
use crate::parse::{require_kind, split_command, strip_quotes, tokenize, UsageError};
use crate::translate::{translate, Translation};

pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Whether the read loop keeps going after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The command interpreter.
///
/// Owns the store for the rest of the process. The store must already be
/// reloaded when it is handed over.
pub struct Console<S, W> {
    store: S,
    out: W,
    prompt: String,
    coercion: CoercionMode,
}

impl<S: ObjectStore, W: Write> Console<S, W> {
    pub fn new(store: S, out: W, config: &ConsoleConfig) -> Self {
        Self {
            store,
            out,
            prompt: config.prompt.clone(),
            coercion: config.coercion,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Read and execute lines until `quit`, `EOF`, or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> ConsoleResult<()> {
        let mut lines = input.lines();
        loop {
            write!(self.out, "{}", self.prompt)?;
            self.out.flush()?;
            let Some(line) = lines.next() else {
                writeln!(self.out)?;
                info!("end of input");
                return Ok(());
            };
            if self.onecmd(&line?)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Execute one input line in either syntax.
    pub fn onecmd(&mut self, line: &str) -> ConsoleResult<Flow> {
        match translate(line) {
            Translation::Unknown => {
                writeln!(self.out, "*** Unknown syntax: {}", line.trim())?;
                Ok(Flow::Continue)
            }
            Translation::Lines(lines) => {
                for canonical in &lines {
                    if self.dispatch(canonical)? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
                Ok(Flow::Continue)
            }
        }
    }

    fn dispatch(&mut self, line: &str) -> ConsoleResult<Flow> {
        let (command, args) = split_command(line);
        if command.is_empty() && args.is_empty() {
            return Ok(Flow::Continue);
        }
        debug!(command, args, "dispatch");
        match command {
            "quit" => return Ok(Flow::Quit),
            "EOF" => {
                writeln!(self.out)?;
                return Ok(Flow::Quit);
            }
            "help" => self.help(args)?,
            "create" => self.create(args)?,
            "show" => self.show(args)?,
            "destroy" => self.destroy(args)?,
            "all" => self.all(args)?,
            "count" => self.count(args)?,
            "update" => self.update(args)?,
            _ => writeln!(self.out, "*** Unknown syntax: {}", line.trim())?,
        }
        Ok(Flow::Continue)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    fn create(&mut self, args: &str) -> ConsoleResult<()> {
        let kind = match require_kind(&tokenize(args)) {
            Ok(kind) => kind,
            Err(e) => return self.report(e),
        };
        let record = Record::new(kind);
        let id = record.id().clone();
        self.store.register(record);
        self.store.persist()?;
        debug!(kind = %kind, id = id.short_id(), "record created");
        writeln!(self.out, "{id}")?;
        Ok(())
    }

    fn show(&mut self, args: &str) -> ConsoleResult<()> {
        let key = match self.locate(&tokenize(args)) {
            Ok(key) => key,
            Err(e) => return self.report(e),
        };
        if let Some(record) = self.store.get(&key) {
            writeln!(self.out, "{record}")?;
        }
        Ok(())
    }

    fn destroy(&mut self, args: &str) -> ConsoleResult<()> {
        let key = match self.locate(&tokenize(args)) {
            Ok(key) => key,
            Err(e) => return self.report(e),
        };
        self.store.remove(&key);
        self.store.persist()?;
        debug!(key = %key, "record destroyed");
        Ok(())
    }

    fn all(&mut self, args: &str) -> ConsoleResult<()> {
        let filter = match tokenize(args).first() {
            None => None,
            Some(name) => match name.parse::<Kind>() {
                Ok(kind) => Some(kind),
                Err(_) => return self.report(UsageError::ClassDoesNotExist),
            },
        };
        let listing = self
            .store
            .all()
            .values()
            .filter(|record| filter.map_or(true, |kind| record.kind() == kind))
            .map(|record| quote_listing_item(&record.to_string()))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(self.out, "[{listing}]")?;
        Ok(())
    }

    /// Unknown kind names count as zero rather than an error.
    fn count(&mut self, args: &str) -> ConsoleResult<()> {
        let tokens = tokenize(args);
        let Some(name) = tokens.first() else {
            return self.report(UsageError::ClassNameMissing);
        };
        let count = name
            .parse::<Kind>()
            .map(|kind| self.store.count(kind))
            .unwrap_or(0);
        writeln!(self.out, "{count}")?;
        Ok(())
    }

    fn update(&mut self, args: &str) -> ConsoleResult<()> {
        let tokens = tokenize(args);
        let key = match self.locate(&tokens) {
            Ok(key) => key,
            Err(e) => return self.report(e),
        };
        let Some(field) = tokens.get(2).map(|f| strip_quotes(f)) else {
            return self.report(UsageError::AttributeNameMissing);
        };
        let Some(raw) = tokens.get(3) else {
            return self.report(UsageError::ValueMissing);
        };
        if RESERVED_FIELDS.contains(&field) {
            return self.report(UsageError::ReservedAttribute);
        }
        let value = match coerce(raw, self.coercion, field, key.kind.field(field)) {
            Ok(value) => value,
            Err(e) => return self.report(e),
        };

        let Some(record) = self.store.get_mut(&key) else {
            return self.report(UsageError::NoInstanceFound);
        };
        if record.set(field, value).is_err() {
            return self.report(UsageError::ReservedAttribute);
        }
        record.touch();
        self.store.persist()?;
        debug!(key = %key, field, "record updated");
        Ok(())
    }

    fn help(&mut self, args: &str) -> ConsoleResult<()> {
        match tokenize(args).first() {
            None => writeln!(self.out, "{}", help::index())?,
            Some(name) => match help::topic(name) {
                Some(text) => writeln!(self.out, "{text}")?,
                None => writeln!(self.out, "*** No help on {name}")?,
            },
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Resolve `<kind> <id>` to the key of an existing record.
    ///
    /// Checks, in order: class name present, class known, id present,
    /// record present.
    fn locate(&self, tokens: &[String]) -> Result<StoreKey, UsageError> {
        let kind = require_kind(tokens)?;
        let id = tokens.get(1).ok_or(UsageError::InstanceIdMissing)?;
        let key = StoreKey::new(kind, strip_quotes(id));
        if self.store.get(&key).is_none() {
            return Err(UsageError::NoInstanceFound);
        }
        Ok(key)
    }

    fn report(&mut self, err: UsageError) -> ConsoleResult<()> {
        debug!(error = %err, "rejected command");
        writeln!(self.out, "{err}")?;
        Ok(())
    }
}

/// Double-quote one entry of an `all` listing.
fn quote_listing_item(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
