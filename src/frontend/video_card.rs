//! Expandable project card with a hover-driven video preview.

use crate::gallery::{self, CardPhase, PlaybackCommand, Project, CARD_TRANSITION_MS};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{window, HtmlElement, HtmlVideoElement, MouseEvent, TransitionEvent};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct VideoCardProps {
    pub project: &'static Project,
    pub hovered: bool,
    pub on_hover_request: Callback<(u32, bool)>,
}

/// Per-card frame loop recomputing expansion progress during the height
/// transition. The generation counter lets a superseded loop notice it is
/// stale and abandon itself instead of fighting the newer one.
#[derive(Default)]
struct ProgressAnimation {
    generation: u64,
    raf_id: Option<i32>,
    tick: Option<Closure<dyn FnMut()>>,
}

impl ProgressAnimation {
    fn cancel(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        if let Some(id) = self.raf_id.take() {
            if let Some(window) = window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        self.tick = None;
        self.generation
    }
}

fn animate_progress(
    animation: &Rc<RefCell<ProgressAnimation>>,
    card_ref: &NodeRef,
    progress: UseStateHandle<f64>,
) {
    let generation = animation.borrow_mut().cancel();
    let Some(window) = window() else {
        return;
    };
    let started = js_sys::Date::now();

    let tick: Closure<dyn FnMut()> = {
        let animation = animation.clone();
        let card_ref = card_ref.clone();
        let window = window.clone();
        Closure::new(move || {
            let mut state = animation.borrow_mut();
            if state.generation != generation {
                return;
            }
            state.raf_id = None;
            if let Some(card) = card_ref.cast::<HtmlElement>() {
                progress.set(gallery::expansion_progress(f64::from(card.offset_height())));
            }
            if js_sys::Date::now() - started < CARD_TRANSITION_MS {
                if let Some(callback) = state.tick.as_ref() {
                    if let Ok(id) =
                        window.request_animation_frame(callback.as_ref().unchecked_ref())
                    {
                        state.raf_id = Some(id);
                    }
                }
            }
        })
    };

    let mut state = animation.borrow_mut();
    if let Ok(id) = window.request_animation_frame(tick.as_ref().unchecked_ref()) {
        state.raf_id = Some(id);
    }
    state.tick = Some(tick);
}

fn apply_playback(video: &HtmlVideoElement, command: PlaybackCommand) {
    match command {
        PlaybackCommand::RestartAndPlay => {
            video.set_current_time(0.0);
            if let Ok(promise) = video.play() {
                // Autoplay policy may reject; the card stays visually expanded
                // either way.
                spawn_local(async move {
                    let _ = JsFuture::from(promise).await;
                });
            }
        }
        PlaybackCommand::PauseAndRewind => {
            let _ = video.pause();
            video.set_current_time(0.0);
        }
    }
}

#[function_component(VideoCard)]
pub fn video_card(props: &VideoCardProps) -> Html {
    let card_ref = use_node_ref();
    let video_ref = use_node_ref();
    let progress = use_state_eq(|| 0.0f64);
    let phase = use_mut_ref(CardPhase::default);
    let animation = use_mut_ref(ProgressAnimation::default);
    let hovered_now = use_mut_ref(|| false);

    // Media element properties the markup can't express, plus rewinding to the
    // first frame once metadata arrives so the poster hands off cleanly.
    {
        let video_ref = video_ref.clone();
        use_effect_with((), move |_| {
            let video = video_ref.cast::<HtmlVideoElement>();
            let mut on_loaded: Option<Closure<dyn FnMut()>> = None;
            if let Some(video) = video.as_ref() {
                video.set_muted(true);
                video.set_loop(true);
                let handle = video.clone();
                let listener: Closure<dyn FnMut()> =
                    Closure::new(move || handle.set_current_time(0.0));
                let _ = video.add_event_listener_with_callback(
                    "loadedmetadata",
                    listener.as_ref().unchecked_ref(),
                );
                on_loaded = Some(listener);
            }
            move || {
                if let (Some(video), Some(listener)) = (video, on_loaded) {
                    let _ = video.remove_event_listener_with_callback(
                        "loadedmetadata",
                        listener.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    // Correctness fallback: when the height transition finishes, snap progress
    // to exactly 0 or 1 even if intermediate frames were skipped.
    {
        let card_ref = card_ref.clone();
        let progress = progress.clone();
        let hovered_now = hovered_now.clone();
        let animation = animation.clone();
        use_effect_with((), move |_| {
            let card = card_ref.cast::<HtmlElement>();
            let mut on_end: Option<Closure<dyn FnMut(TransitionEvent)>> = None;
            if let Some(card) = card.as_ref() {
                let listener: Closure<dyn FnMut(TransitionEvent)> =
                    Closure::new(move |event: TransitionEvent| {
                        if event.property_name() != "height" {
                            return;
                        }
                        animation.borrow_mut().cancel();
                        progress.set(if *hovered_now.borrow() { 1.0 } else { 0.0 });
                    });
                let _ = card.add_event_listener_with_callback(
                    "transitionend",
                    listener.as_ref().unchecked_ref(),
                );
                on_end = Some(listener);
            }
            move || {
                if let (Some(card), Some(listener)) = (card, on_end) {
                    let _ = card.remove_event_listener_with_callback(
                        "transitionend",
                        listener.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    // React to hover changes: drive playback through the phase machine and
    // restart the progress loop for the new transition.
    {
        let video_ref = video_ref.clone();
        let card_ref = card_ref.clone();
        let phase = phase.clone();
        let animation = animation.clone();
        let progress = progress.clone();
        let hovered_now = hovered_now.clone();
        use_effect_with(props.hovered, move |hovered| {
            *hovered_now.borrow_mut() = *hovered;
            if let Some(command) = phase.borrow_mut().transition(*hovered) {
                if let Some(video) = video_ref.cast::<HtmlVideoElement>() {
                    apply_playback(&video, command);
                }
            }
            animate_progress(&animation, &card_ref, progress);
            move || {
                animation.borrow_mut().cancel();
            }
        });
    }

    let onmouseenter = {
        let on_hover_request = props.on_hover_request.clone();
        let id = props.project.id;
        Callback::from(move |_: MouseEvent| on_hover_request.emit((id, true)))
    };
    let onmouseleave = {
        let on_hover_request = props.on_hover_request.clone();
        let id = props.project.id;
        Callback::from(move |_: MouseEvent| on_hover_request.emit((id, false)))
    };

    let project = props.project;
    let detail_style = format!("opacity: {:.3};", *progress);
    let tech_tags = project
        .tech
        .iter()
        .map(|tag| html! { <li key={*tag}>{*tag}</li> })
        .collect::<Html>();

    html! {
        <article
            ref={card_ref}
            class={classes!("video-card", props.hovered.then_some("is-expanded"))}
            data-card-id={project.id.to_string()}
            onmouseenter={onmouseenter}
            onmouseleave={onmouseleave}
        >
            <video
                ref={video_ref}
                class={classes!("video-card-media", (!props.hovered).then_some("is-dimmed"))}
                poster={project.thumbnail}
                preload="metadata"
                playsinline="true"
            >
                <source src={project.video} type="video/mp4" />
            </video>

            <div class={classes!("card-overlay", "card-preview", props.hovered.then_some("is-faded"))}>
                <div class="overline">{project.year}</div>
                <h3 class="card-title">{project.name}</h3>
                <p class="card-company">{project.company}</p>
            </div>

            <div
                class={classes!("card-overlay", "card-detail", props.hovered.then_some("is-active"))}
                style={detail_style}
            >
                <div class="overline">{project.year}</div>
                <h3 class="card-title">{project.name}</h3>
                <p class="card-company">{project.company}</p>
                <p class="card-description">{project.description}</p>
                <ul class="tag-list">{tech_tags}</ul>
                <div class="card-actions">
                    { for project.github_url.map(|url| html! {
                        <a class="card-action" href={url} target="_blank" rel="noopener noreferrer">{"GitHub"}</a>
                    }) }
                    { for project.more_info_url.map(|url| html! {
                        <a class="card-action" href={url} target="_blank" rel="noopener noreferrer">{"More Info"}</a>
                    }) }
                </div>
            </div>
        </article>
    }
}
