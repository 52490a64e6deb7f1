//! Interactive line-oriented shell over a [`Tracker`].
//!
//! Each line is resolved to a [`Command`]; unknown text becomes
//! [`Command::Unrecognized`] instead of silently doing nothing. Commands that
//! need more input prompt for it field by field. End of input behaves like
//! `QUIT`.

use std::io::{self, BufRead, Write};

use poptrack_core::{Figure, Set, SetKey};
use poptrack_storage::{CollectionStore, Tracker};

/// Every command the shell understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddSet,
    AddFigure,
    MarkFigure,
    DeleteFigure,
    DeleteSet,
    ShowSet,
    List,
    Save,
    Reload,
    Help,
    Quit,
    Unrecognized(String),
}

impl Command {
    /// Resolves a line of input, ignoring case and surrounding whitespace.
    pub fn parse(input: &str) -> Command {
        match input.trim().to_uppercase().as_str() {
            "ADD SET" => Command::AddSet,
            "ADD FIGURE" => Command::AddFigure,
            "MARK FIGURE" => Command::MarkFigure,
            "DELETE FIGURE" => Command::DeleteFigure,
            "DELETE SET" => Command::DeleteSet,
            "SHOW SET" => Command::ShowSet,
            "LIST" => Command::List,
            "SAVE" => Command::Save,
            "RELOAD" => Command::Reload,
            "HELP" => Command::Help,
            "QUIT" => Command::Quit,
            _ => Command::Unrecognized(input.trim().to_string()),
        }
    }
}

const HELP_TEXT: &str = "\
Commands:
  ADD SET        create a set
  ADD FIGURE     add a figure to a set
  MARK FIGURE    mark a figure as collected
  DELETE FIGURE  remove a figure from a set
  DELETE SET     remove a set
  SHOW SET       print a set and its figures
  LIST           list every set
  SAVE           write changes to the database
  RELOAD         discard unsaved changes and reload
  QUIT           leave the tracker";

/// Runs the prompt loop until `QUIT` or end of input.
pub fn run<S, R, W>(tracker: &mut Tracker<S>, input: R, output: W) -> io::Result<()>
where
    S: CollectionStore,
    R: BufRead,
    W: Write,
{
    let mut shell = Shell {
        tracker,
        input,
        output,
    };
    shell.run()
}

struct Shell<'a, S: CollectionStore, R, W> {
    tracker: &'a mut Tracker<S>,
    input: R,
    output: W,
}

impl<S: CollectionStore, R: BufRead, W: Write> Shell<'_, S, R, W> {
    fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Welcome to the Popmart Tracker!")?;
        writeln!(self.output, "Please type in \"HELP\" if you need assistance")?;
        writeln!(self.output)?;

        loop {
            let Some(line) = self.prompt("INPUT: ")? else {
                break;
            };
            let command = Command::parse(&line);
            tracing::debug!(?command, "dispatching shell command");
            if !self.execute(command)? {
                break;
            }
        }

        writeln!(self.output, "\nExited Popmart Tracker")?;
        Ok(())
    }

    /// Runs one command. Returns `false` when the shell should stop.
    fn execute(&mut self, command: Command) -> io::Result<bool> {
        let keep_going = match command {
            Command::AddSet => self.add_set()?,
            Command::AddFigure => self.add_figure()?,
            Command::MarkFigure => self.mark_figure()?,
            Command::DeleteFigure => self.delete_figure()?,
            Command::DeleteSet => self.delete_set()?,
            Command::ShowSet => self.show_set()?,
            Command::List => {
                self.list()?;
                true
            }
            Command::Save => {
                self.save()?;
                true
            }
            Command::Reload => {
                match self.tracker.reload_all() {
                    Ok(()) => writeln!(self.output, "Reloaded {} set(s)", self.tracker.collection().len())?,
                    Err(e) => writeln!(self.output, "Reload failed: {}", e)?,
                }
                true
            }
            Command::Help => {
                writeln!(self.output, "{}", HELP_TEXT)?;
                true
            }
            Command::Quit => false,
            Command::Unrecognized(_) => {
                writeln!(self.output, "Invalid command, try again!")?;
                true
            }
        };
        Ok(keep_going)
    }

    // -------------------------------------------------------------------
    // Command handlers. Each returns `false` if input ran out mid-prompt.
    // -------------------------------------------------------------------

    fn add_set(&mut self) -> io::Result<bool> {
        writeln!(self.output, "\nPlease enter the set information:")?;
        let Some((brand, series)) = self.prompt_set_identity()? else {
            return Ok(false);
        };
        let Some(price) = self.prompt_price()? else {
            return Ok(false);
        };

        let set = Set::new(brand, series, price);
        writeln!(
            self.output,
            "Set {} {} created with price {:?}\n",
            set.brand(),
            set.series_name(),
            set.price()
        )?;
        self.tracker.collection_mut().add_set(set);
        Ok(true)
    }

    fn add_figure(&mut self) -> io::Result<bool> {
        let Some((brand, series)) = self.prompt_set_identity()? else {
            return Ok(false);
        };
        let Some(name) = self.prompt("Figure Name: ")? else {
            return Ok(false);
        };
        let Some(probability) = self.prompt_probability()? else {
            return Ok(false);
        };
        let Some(collected) = self.prompt_yes_no("Collected? (y/n): ")? else {
            return Ok(false);
        };
        let Some(secret) = self.prompt_yes_no("Secret? (y/n): ")? else {
            return Ok(false);
        };

        let key = SetKey::new(&brand, &series);
        let figure = Figure::new(name.clone(), probability, collected, secret);
        match self.tracker.collection_mut().add_figure_to_set(&key, figure) {
            Ok(()) => writeln!(self.output, "Figure {} added to {} {}", name, brand, series)?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(true)
    }

    fn mark_figure(&mut self) -> io::Result<bool> {
        let Some((brand, series)) = self.prompt_set_identity()? else {
            return Ok(false);
        };
        let Some(name) = self.prompt("Figure Name: ")? else {
            return Ok(false);
        };

        let key = SetKey::new(&brand, &series);
        match self.tracker.collection_mut().mark_figure_in_set(&key, &name) {
            Ok(()) => writeln!(self.output, "Figure {} marked as collected", name)?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(true)
    }

    fn delete_figure(&mut self) -> io::Result<bool> {
        let Some((brand, series)) = self.prompt_set_identity()? else {
            return Ok(false);
        };
        let Some(name) = self.prompt("Figure Name: ")? else {
            return Ok(false);
        };

        let key = SetKey::new(&brand, &series);
        match self.tracker.collection_mut().delete_figure_in_set(&key, &name) {
            Ok(()) => writeln!(self.output, "Figure {} deleted", name)?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(true)
    }

    fn delete_set(&mut self) -> io::Result<bool> {
        let Some((brand, series)) = self.prompt_set_identity()? else {
            return Ok(false);
        };
        match self.tracker.collection_mut().delete_set(&brand, &series) {
            Ok(()) => writeln!(self.output, "Set {} {} deleted", brand, series)?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(true)
    }

    fn show_set(&mut self) -> io::Result<bool> {
        let Some((brand, series)) = self.prompt_set_identity()? else {
            return Ok(false);
        };
        match self.tracker.collection().get_set(&brand, &series) {
            Ok(set) => writeln!(self.output, "{}\n{}", set, set.figure_listing())?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(true)
    }

    fn list(&mut self) -> io::Result<()> {
        if self.tracker.collection().is_empty() {
            return writeln!(self.output, "No sets");
        }
        for set in self.tracker.collection().sets() {
            writeln!(
                self.output,
                "{} {} ({} figures)",
                set.brand(),
                set.series_name(),
                set.figure_count()
            )?;
        }
        Ok(())
    }

    fn save(&mut self) -> io::Result<()> {
        match self.tracker.save_all() {
            Ok(report) => writeln!(
                self.output,
                "Saved: {} set(s) and {} figure(s) added, {} mark(s), {} set(s) and {} figure(s) deleted",
                report.sets_inserted,
                report.figures_inserted,
                report.marks_flushed,
                report.sets_deleted,
                report.figures_deleted
            ),
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                writeln!(self.output, "Save failed: {}", e)
            }
        }
    }

    // -------------------------------------------------------------------
    // Prompts. `Ok(None)` means end of input.
    // -------------------------------------------------------------------

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt_set_identity(&mut self) -> io::Result<Option<(String, String)>> {
        let Some(brand) = self.prompt("Brand: ")? else {
            return Ok(None);
        };
        let Some(series) = self.prompt("Series Name: ")? else {
            return Ok(None);
        };
        Ok(Some((brand, series)))
    }

    /// Empty input means the default price of 0.0.
    fn prompt_price(&mut self) -> io::Result<Option<f64>> {
        loop {
            let Some(input) = self.prompt("Price: ")? else {
                return Ok(None);
            };
            if input.trim().is_empty() {
                return Ok(Some(0.0));
            }
            match input.trim().parse::<f64>() {
                Ok(price) => return Ok(Some(price)),
                Err(_) => writeln!(self.output, "Invalid input for price, please try again.\n")?,
            }
        }
    }

    fn prompt_probability(&mut self) -> io::Result<Option<f64>> {
        loop {
            let Some(input) = self.prompt("Probability: ")? else {
                return Ok(None);
            };
            match input.trim().parse::<f64>() {
                Ok(probability) => return Ok(Some(probability)),
                Err(_) => writeln!(self.output, "Invalid input for probability, please try again.\n")?,
            }
        }
    }

    /// Empty input counts as "no".
    fn prompt_yes_no(&mut self, label: &str) -> io::Result<Option<bool>> {
        loop {
            let Some(input) = self.prompt(label)? else {
                return Ok(None);
            };
            match input.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" | "" => return Ok(Some(false)),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }
}
