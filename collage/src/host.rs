//! A headless stand-in for a touch screen. Reads one command per line and turns it into canvas
//! events, printing what a real host would render or prompt.
//!
//! ```text
//! add <path>...                      place photos on top
//! gesture <n> <rot> <scale> <dx> <dy>  one manipulation frame on photo n
//! tap <n>                            double tap photo n
//! clear                              asks for confirmation, answer yes / no
//! save [path | -]                    `-` dismisses the picker
//! list                               paint order, back to front
//! quit
//! ```

use collage_core::{
    bitmap::Bitmap,
    commands::{Dispatcher, Event, Output},
    state::{transform::ManipulationDelta, ObjectID},
};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("{command} expects {expected}")]
    Arguments {
        command: &'static str,
        expected: &'static str,
    },
    #[error("expected a number, got {0:?}")]
    Number(String),
}

/// Where a save should go, as the user answered the save picker.
#[derive(Clone, Debug, PartialEq)]
pub enum SaveTarget {
    /// Accept the suggested name.
    Suggested,
    Path(std::path::PathBuf),
    Dismissed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Line {
    Add(Vec<std::path::PathBuf>),
    Gesture {
        photo: u64,
        delta: ManipulationDelta,
    },
    Tap(u64),
    Clear,
    Yes,
    No,
    Save(SaveTarget),
    List,
    Quit,
    Empty,
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, ParseError> {
    word.parse().map_err(|_| ParseError::Number(word.to_owned()))
}

/// # Errors
/// Unknown commands, missing or extra arguments, and malformed numbers.
pub fn parse(line: &str) -> Result<Line, ParseError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Line::Empty);
    };
    let rest: Vec<&str> = words.collect();

    match (command, rest.as_slice()) {
        ("add", []) => Err(ParseError::Arguments {
            command: "add",
            expected: "at least one path",
        }),
        ("add", paths) => Ok(Line::Add(paths.iter().map(Into::into).collect())),
        ("gesture", [photo, rotation, scale, dx, dy]) => Ok(Line::Gesture {
            photo: number(photo)?,
            delta: ManipulationDelta::new(
                number(rotation)?,
                number(scale)?,
                number(dx)?,
                number(dy)?,
            ),
        }),
        ("gesture", _) => Err(ParseError::Arguments {
            command: "gesture",
            expected: "<n> <rotation> <scale> <dx> <dy>",
        }),
        ("tap", [photo]) => Ok(Line::Tap(number(photo)?)),
        ("tap", _) => Err(ParseError::Arguments {
            command: "tap",
            expected: "<n>",
        }),
        ("save", []) => Ok(Line::Save(SaveTarget::Suggested)),
        ("save", ["-"]) => Ok(Line::Save(SaveTarget::Dismissed)),
        ("save", [path]) => Ok(Line::Save(SaveTarget::Path(path.into()))),
        ("save", _) => Err(ParseError::Arguments {
            command: "save",
            expected: "at most one path",
        }),
        ("clear", []) => Ok(Line::Clear),
        ("yes", []) => Ok(Line::Yes),
        ("no", []) => Ok(Line::No),
        ("list", []) => Ok(Line::List),
        ("quit" | "exit", []) => Ok(Line::Quit),
        (other, _) => Err(ParseError::UnknownCommand(other.to_owned())),
    }
}

/// Default save location, like a picker opened in the pictures library.
fn suggested_path() -> std::path::PathBuf {
    let name = collage_core::io::suggested_file_name(chrono::Local::now().naive_local());
    let mut path = dirs::picture_dir().unwrap_or_default();
    path.push(name);
    path
}

/// Tracks which numbers the user knows photos by.
pub struct Host {
    dispatcher: Dispatcher,
    photos: hashbrown::HashMap<u64, ObjectID>,
}
impl Host {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            photos: hashbrown::HashMap::new(),
        }
    }
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
    /// Feed one event to the canvas and describe the result.
    /// # Errors
    /// The canvas and this host disagree about which photos exist. Unrecoverable.
    pub fn send(&mut self, event: Event) -> anyhow::Result<String> {
        let output = self.dispatcher.dispatch(event)?;
        Ok(self.describe(output))
    }
    /// Handle one parsed line. `Ok(None)` means quit.
    /// # Errors
    /// See [`Self::send`].
    pub fn handle(
        &mut self,
        line: Line,
        load: impl FnOnce(Vec<std::path::PathBuf>) -> Vec<Bitmap>,
    ) -> anyhow::Result<Option<String>> {
        let event = match line {
            Line::Quit => return Ok(None),
            Line::Empty => return Ok(Some(String::new())),
            Line::List => return Ok(Some(self.list())),
            Line::Add(paths) => Event::AddObjects(load(paths)),
            Line::Gesture { photo, delta } => match self.photos.get(&photo) {
                Some(&target) => Event::GestureDelta { target, delta },
                None => return Ok(Some(format!("no photo #{photo}"))),
            },
            Line::Tap(photo) => match self.photos.get(&photo) {
                Some(&target) => Event::Activate { target },
                None => return Ok(Some(format!("no photo #{photo}"))),
            },
            Line::Clear => Event::RequestClear,
            Line::Yes | Line::No if !self.dispatcher.is_clear_pending() => {
                return Ok(Some("nothing to answer".to_owned()))
            }
            Line::Yes => Event::ConfirmClear,
            Line::No => Event::DeclineClear,
            Line::Save(target) => Event::SaveRequested {
                target: match target {
                    SaveTarget::Suggested => Some(suggested_path()),
                    SaveTarget::Path(path) => Some(path),
                    SaveTarget::Dismissed => None,
                },
            },
        };
        self.send(event).map(Some)
    }
    fn describe(&mut self, output: Output) -> String {
        match output {
            Output::TransformChanged { target, transform } => format!(
                "#{} rotation {:.3} scale {:.3}x{:.3} translation {:.3},{:.3}",
                target.id(),
                transform.rotation,
                transform.scale[0],
                transform.scale[1],
                transform.translation[0],
                transform.translation[1],
            ),
            Output::ZOrderChanged(order) => format!("order {}", Self::numbers(&order)),
            Output::ObjectsAdded(ids) => {
                self.photos.extend(ids.iter().map(|&id| (id.id(), id)));
                format!("added {}", Self::numbers(&ids))
            }
            Output::ObjectRemoved(id) => {
                self.photos.remove(&id.id());
                format!("removed #{}", id.id())
            }
            Output::ConfirmClearPrompt { title, message } => {
                format!("{title}: {message} [yes/no]")
            }
            Output::Cleared => {
                self.photos.clear();
                "cleared".to_owned()
            }
            Output::Saved(path) => format!("saved {}", path.display()),
            Output::SaveFailed(message) => format!("save failed: {message}"),
            Output::NoOp => "nothing changed".to_owned(),
        }
    }
    fn list(&self) -> String {
        let order: Vec<_> = self.dispatcher.canvas().z_order().iter().collect();
        format!("order {}", Self::numbers(&order))
    }
    fn numbers(ids: &[ObjectID]) -> String {
        ids.iter()
            .map(|id| format!("#{}", id.id()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
