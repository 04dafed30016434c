//! # Commands
//!
//! The contract between a host and a canvas. The host turns whatever its windowing system delivers
//! (manipulation events, double taps, button presses, picker results) into [`Event`]s and feeds them,
//! one at a time, to a [`Dispatcher`]. Each yields one [`Output`] for the host to act upon.

use crate::{
    bitmap::Bitmap,
    io,
    state::{
        transform::{CompositeTransform, ManipulationDelta},
        Activation, Canvas, ClearRequest, ObjectID, RegistryError,
    },
};

/// Inbound, from the host.
#[derive(Debug)]
pub enum Event {
    /// A gesture frame on one object.
    GestureDelta {
        target: ObjectID,
        delta: ManipulationDelta,
    },
    /// A double tap on one object.
    Activate { target: ObjectID },
    /// Photos the user picked. Empty if the picker was dismissed.
    AddObjects(Vec<Bitmap>),
    /// The user wants to wipe the canvas. Must be confirmed before anything happens.
    RequestClear,
    ConfirmClear,
    DeclineClear,
    /// `None` if the save picker was dismissed.
    SaveRequested { target: Option<std::path::PathBuf> },
}

/// Outbound, to the host.
#[derive(Clone, Debug, PartialEq)]
pub enum Output {
    /// Re-render `target` with `transform`.
    TransformChanged {
        target: ObjectID,
        transform: CompositeTransform,
    },
    /// New paint order, back to front.
    ZOrderChanged(Vec<ObjectID>),
    /// Newly placed objects, back to front. All of them are above every pre-existing object.
    ObjectsAdded(smallvec::SmallVec<[ObjectID; 1]>),
    ObjectRemoved(ObjectID),
    /// Ask the user, then answer with [`Event::ConfirmClear`] or [`Event::DeclineClear`].
    ConfirmClearPrompt {
        title: &'static str,
        message: &'static str,
    },
    Cleared,
    Saved(std::path::PathBuf),
    /// Show to the user. The session carries on.
    SaveFailed(String),
    /// Nothing changed.
    NoOp,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// The host referenced an object the canvas doesn't have. The host's bookkeeping and the
    /// canvas disagree, and continuing would only compound that.
    #[error("host and canvas are out of sync: {0}")]
    Desynchronized(#[from] RegistryError),
}

/// Owns a canvas and applies events to it, in order, on the caller's thread.
#[derive(Default)]
pub struct Dispatcher {
    canvas: Canvas,
    pending_clear: Option<ClearRequest>,
}
impl Dispatcher {
    #[must_use]
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            pending_clear: None,
        }
    }
    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
    #[must_use]
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }
    /// Whether a clear is waiting on the user's answer.
    #[must_use]
    pub fn is_clear_pending(&self) -> bool {
        self.pending_clear.is_some()
    }
    /// Apply a single event.
    /// # Errors
    /// Only for events naming objects the canvas doesn't have, see [`DispatchError`].
    /// Recoverable failures, like a failed save, are reported as an [`Output`] instead.
    pub fn dispatch(&mut self, event: Event) -> Result<Output, DispatchError> {
        match event {
            Event::GestureDelta { target, delta } => {
                match self.canvas.manipulate(target, &delta) {
                    Ok(transform) => Ok(Output::TransformChanged { target, transform }),
                    Err(e) => {
                        log::error!("Gesture for unknown object: {e}");
                        Err(e.into())
                    }
                }
            }
            Event::Activate { target } => Ok(match self.canvas.activate(target) {
                Activation::BroughtToFront => {
                    Output::ZOrderChanged(self.canvas.z_order().iter().collect())
                }
                Activation::Removed => Output::ObjectRemoved(target),
                Activation::Ignored => {
                    log::debug!("Activation of unknown {target} ignored");
                    Output::NoOp
                }
            }),
            Event::AddObjects(bitmaps) => {
                if bitmaps.is_empty() {
                    return Ok(Output::NoOp);
                }
                Ok(Output::ObjectsAdded(self.canvas.add_objects(bitmaps)))
            }
            Event::RequestClear => {
                // Asking twice is still one pending request.
                if self.pending_clear.is_none() {
                    self.pending_clear = Some(self.canvas.request_clear());
                }
                Ok(Output::ConfirmClearPrompt {
                    title: ClearRequest::TITLE,
                    message: ClearRequest::MESSAGE,
                })
            }
            Event::ConfirmClear => Ok(match self.pending_clear.take() {
                Some(request) => {
                    if self.canvas.confirm_clear(request) {
                        Output::Cleared
                    } else {
                        Output::NoOp
                    }
                }
                None => {
                    log::warn!("Clear confirmed without being requested, ignoring");
                    Output::NoOp
                }
            }),
            Event::DeclineClear => {
                self.pending_clear = None;
                Ok(Output::NoOp)
            }
            Event::SaveRequested { target } => {
                Ok(match io::save(&self.canvas, target.as_deref()) {
                    Ok(io::SaveOutcome::Saved(path)) => Output::Saved(path),
                    Ok(io::SaveOutcome::Cancelled) => Output::NoOp,
                    Err(e) => {
                        log::error!("{e}");
                        Output::SaveFailed(e.to_string())
                    }
                })
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn photos(count: usize) -> Vec<Bitmap> {
        vec![Bitmap::solid(2, 2, [9, 9, 9, 255]); count]
    }
    fn added(dispatcher: &mut Dispatcher, count: usize) -> Vec<ObjectID> {
        match dispatcher.dispatch(Event::AddObjects(photos(count))) {
            Ok(Output::ObjectsAdded(ids)) => ids.into_vec(),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn gesture_flow() {
        let mut dispatcher = Dispatcher::default();
        let a = added(&mut dispatcher, 1)[0];

        let output = dispatcher
            .dispatch(Event::GestureDelta {
                target: a,
                delta: ManipulationDelta::new(15.0, 1.1, 5.0, -3.0),
            })
            .unwrap();
        let Output::TransformChanged { target, transform } = output else {
            panic!("unexpected {output:?}");
        };
        assert_eq!(target, a);
        assert_eq!(transform.rotation, 15.0);
        assert_eq!(dispatcher.canvas().transform(a), Ok(transform));
    }
    #[test]
    fn gesture_on_unknown_is_fatal() {
        let mut dispatcher = Dispatcher::default();
        let stranger = ObjectID::default();
        assert_eq!(
            dispatcher.dispatch(Event::GestureDelta {
                target: stranger,
                delta: ManipulationDelta::NONE,
            }),
            Err(DispatchError::Desynchronized(RegistryError::NotFound(
                stranger
            )))
        );
    }
    #[test]
    fn double_tap_reorders() {
        let mut dispatcher = Dispatcher::default();
        let ids = added(&mut dispatcher, 3);
        assert_eq!(
            dispatcher.dispatch(Event::Activate { target: ids[1] }),
            Ok(Output::ZOrderChanged(vec![ids[0], ids[2], ids[1]]))
        );
        assert_eq!(
            dispatcher.dispatch(Event::Activate {
                target: ObjectID::default()
            }),
            Ok(Output::NoOp)
        );
    }
    #[test]
    fn empty_pick_is_noop() {
        let mut dispatcher = Dispatcher::default();
        assert_eq!(
            dispatcher.dispatch(Event::AddObjects(Vec::new())),
            Ok(Output::NoOp)
        );
        assert!(dispatcher.canvas().is_empty());
    }
    #[test]
    fn clear_needs_confirmation() {
        let mut dispatcher = Dispatcher::default();
        added(&mut dispatcher, 2);

        // Confirming out of the blue does nothing.
        assert_eq!(dispatcher.dispatch(Event::ConfirmClear), Ok(Output::NoOp));
        assert_eq!(dispatcher.canvas().len(), 2);

        assert_eq!(
            dispatcher.dispatch(Event::RequestClear),
            Ok(Output::ConfirmClearPrompt {
                title: ClearRequest::TITLE,
                message: ClearRequest::MESSAGE,
            })
        );
        assert!(dispatcher.is_clear_pending());
        assert_eq!(dispatcher.dispatch(Event::DeclineClear), Ok(Output::NoOp));
        assert!(!dispatcher.is_clear_pending());
        assert_eq!(dispatcher.canvas().len(), 2);

        dispatcher.dispatch(Event::RequestClear).unwrap();
        assert_eq!(dispatcher.dispatch(Event::ConfirmClear), Ok(Output::Cleared));
        assert!(dispatcher.canvas().is_empty());
        assert!(dispatcher.canvas().z_order().is_empty());
    }
    #[test]
    fn cancelled_and_failed_saves() {
        let mut dispatcher = Dispatcher::default();
        assert_eq!(
            dispatcher.dispatch(Event::SaveRequested { target: None }),
            Ok(Output::NoOp)
        );
        let failed = dispatcher.dispatch(Event::SaveRequested {
            target: Some("/nonexistent-collage-dir/out.png".into()),
        });
        assert!(matches!(failed, Ok(Output::SaveFailed(_))));
    }
}
