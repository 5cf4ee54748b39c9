//! Viewport intersection tracking for nav highlighting and one-time reveals.

use crate::gallery::SectionState;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    Window,
};
use yew::prelude::*;

const VISIBILITY_THRESHOLD: f64 = 0.1;
// Negative bottom bias so a section activates slightly before the exact edge.
const ROOT_MARGIN: &str = "0px 0px -10% 0px";
const HIDDEN_CLASS: &str = "section-hidden";
const REVEALED_CLASS: &str = "section-revealed";

fn reveal(element: &Element) {
    let class_list = element.class_list();
    let _ = class_list.remove_1(HIDDEN_CLASS);
    let _ = class_list.add_1(REVEALED_CLASS);
}

struct SectionObserver {
    window: Window,
    observer: IntersectionObserver,
    timeout_id: Option<i32>,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
    _init_timer: Closure<dyn FnMut()>,
}

impl SectionObserver {
    fn install(
        sections: Vec<(&'static str, NodeRef)>,
        on_active: Callback<&'static str>,
    ) -> Option<Self> {
        let window = window()?;
        let state = Rc::new(RefCell::new(SectionState::default()));
        let ids: Vec<&'static str> = sections.iter().map(|(id, _)| *id).collect();

        let callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)> = {
            let state = state.clone();
            Closure::new(move |entries: js_sys::Array, _: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    let Some(id) = ids.iter().copied().find(|id| *id == target.id()) else {
                        continue;
                    };
                    let update = state.borrow_mut().intersected(id);
                    if update.first_reveal {
                        reveal(&target);
                    }
                    if update.activated {
                        on_active.emit(id);
                    }
                }
            })
        };

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(VISIBILITY_THRESHOLD));
        init.set_root_margin(ROOT_MARGIN);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .ok()?;

        // Observe once the current render has settled, and reveal any section
        // already in view before the observer's first callback fires.
        let init_timer: Closure<dyn FnMut()> = {
            let observer = observer.clone();
            let window = window.clone();
            Closure::new(move || {
                let viewport_height = window
                    .inner_height()
                    .ok()
                    .and_then(|value| value.as_f64())
                    .unwrap_or(0.0);
                for (id, node_ref) in &sections {
                    let Some(element) = node_ref.cast::<Element>() else {
                        continue;
                    };
                    observer.observe(&element);
                    let rect = element.get_bounding_client_rect();
                    let in_viewport = rect.top() < viewport_height && rect.bottom() > 0.0;
                    if in_viewport && state.borrow_mut().reveal_only(*id) {
                        reveal(&element);
                    }
                }
            })
        };
        let timeout_id = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                init_timer.as_ref().unchecked_ref(),
                0,
            )
            .ok();

        Some(Self {
            window,
            observer,
            timeout_id,
            _callback: callback,
            _init_timer: init_timer,
        })
    }
}

impl Drop for SectionObserver {
    fn drop(&mut self) {
        if let Some(id) = self.timeout_id.take() {
            self.window.clear_timeout_with_handle(id);
        }
        self.observer.disconnect();
    }
}

/// Observes the given sections for the calling component's lifetime, emitting
/// the active section id as the user scrolls.
#[hook]
pub fn use_section_reveal(
    sections: Vec<(&'static str, NodeRef)>,
    on_active: Callback<&'static str>,
) {
    use_effect_with((), move |_| {
        let observer = SectionObserver::install(sections, on_active);
        move || drop(observer)
    });
}
