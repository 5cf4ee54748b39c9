//! Document-level pointer tracking, coalesced to one hit-test per frame.

use crate::gallery::{self, HitTest, PointerSampler};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, AddEventListenerOptions, Document, MouseEvent, Window};
use yew::prelude::*;

/// `document.elementFromPoint` plus the walk up to the nearest card ancestor.
struct DomSurface {
    document: Document,
}

impl HitTest for DomSurface {
    fn card_at(&self, x: i32, y: i32) -> Option<u32> {
        let element = self.document.element_from_point(x as f32, y as f32)?;
        let card = element.closest("[data-card-id]").ok().flatten()?;
        let raw = card.get_attribute("data-card-id")?;
        gallery::parse_card_id(&raw)
    }
}

/// Live pointer subscription; tears itself down on drop.
struct PointerSubscription {
    window: Window,
    mousemove: Closure<dyn FnMut(MouseEvent)>,
    scroll: Closure<dyn FnMut()>,
    // Held so the frame callback outlives any pending requestAnimationFrame.
    _frame: Rc<Closure<dyn FnMut()>>,
    raf_id: Rc<Cell<Option<i32>>>,
}

impl PointerSubscription {
    fn install(on_resolve: Callback<Option<u32>>) -> Option<Self> {
        let window = window()?;
        let document = window.document()?;
        let sampler = Rc::new(RefCell::new(PointerSampler::default()));
        let raf_id = Rc::new(Cell::new(None::<i32>));

        let frame: Rc<Closure<dyn FnMut()>> = {
            let sampler = sampler.clone();
            let raf_id = raf_id.clone();
            let surface = DomSurface { document };
            Rc::new(Closure::new(move || {
                raf_id.set(None);
                let resolved = gallery::resolve_hover(&mut sampler.borrow_mut(), &surface);
                on_resolve.emit(resolved);
            }))
        };

        let schedule = {
            let window = window.clone();
            let frame = frame.clone();
            let raf_id = raf_id.clone();
            move || {
                if let Ok(id) =
                    window.request_animation_frame((*frame).as_ref().unchecked_ref())
                {
                    raf_id.set(Some(id));
                }
            }
        };

        let mousemove: Closure<dyn FnMut(MouseEvent)> = {
            let sampler = sampler.clone();
            let schedule = schedule.clone();
            Closure::new(move |event: MouseEvent| {
                if sampler
                    .borrow_mut()
                    .record_move(event.client_x(), event.client_y())
                {
                    schedule();
                }
            })
        };

        let scroll: Closure<dyn FnMut()> = Closure::new(move || {
            if sampler.borrow_mut().record_scroll() {
                schedule();
            }
        });

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            "mousemove",
            mousemove.as_ref().unchecked_ref(),
            &options,
        );
        let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            scroll.as_ref().unchecked_ref(),
            &options,
        );

        Some(Self {
            window,
            mousemove,
            scroll,
            _frame: frame,
            raf_id,
        })
    }
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("mousemove", self.mousemove.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("scroll", self.scroll.as_ref().unchecked_ref());
        if let Some(id) = self.raf_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

/// Tracks the pointer for the lifetime of the calling component and emits the
/// resolved card id (or `None`) at most once per animation frame.
#[hook]
pub fn use_pointer_hover(on_resolve: Callback<Option<u32>>) {
    use_effect_with((), move |_| {
        let subscription = PointerSubscription::install(on_resolve);
        move || drop(subscription)
    });
}
