//! Presentation of committed views.
//!
//! The pipeline hands views over in token order, but the transition to each
//! one is asynchronous: a newer view can arrive while an older one is still
//! fading out or settling into the document. [`Presenter`] remembers the
//! newest token it was offered and abandons any older transition at its
//! next suspension point, so only the newest view is ever revealed.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use crate::core::pipeline::{RenderToken, RenderedView, Transition};

/// The surface views are presented on.
#[allow(async_fn_in_trait)]
pub trait Screen {
    /// Scroll to the top and fade the current content out.
    async fn leave(&self);
    /// Replace the visible content.
    fn swap(&self, rendered: RenderedView);
    /// Wait until swapped content has reached the document.
    async fn settle(&self);
    /// Post-process the swapped content and fade it in.
    fn reveal(&self, title: &str);
}

/// How one presentation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presented {
    Shown(RenderToken),
    /// A newer view was offered before this one finished
    Superseded(RenderToken),
}

pub struct Presenter<S> {
    screen: S,
    latest: Cell<Option<RenderToken>>,
}

impl<S: Screen + 'static> Presenter<S> {
    pub fn new(screen: S) -> Rc<Self> {
        Rc::new(Self {
            screen,
            latest: Cell::new(None),
        })
    }

    /// Offer `rendered` and return its transition.
    ///
    /// The view becomes the newest one before this returns.
    pub fn present(
        self: &Rc<Self>,
        rendered: RenderedView,
    ) -> impl Future<Output = Presented> + use<S> {
        let token = rendered.token;
        self.latest.set(Some(token));
        let this = Rc::clone(self);

        async move {
            if rendered.transition == Transition::Fade {
                this.screen.leave().await;
            }
            if !this.is_latest(token) {
                tracing::debug!(?token, "transition superseded before swap");
                return Presented::Superseded(token);
            }

            let title = rendered.title.clone();
            this.screen.swap(rendered);
            this.screen.settle().await;
            if !this.is_latest(token) {
                tracing::debug!(?token, "transition superseded before reveal");
                return Presented::Superseded(token);
            }

            this.screen.reveal(&title);
            Presented::Shown(token)
        }
    }

    fn is_latest(&self, token: RenderToken) -> bool {
        self.latest.get() == Some(token)
    }
}
