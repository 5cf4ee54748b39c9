mod pointer;
mod sections;
mod video_card;

use crate::gallery::{self, HoverState, SECTION_IDS};
use pointer::use_pointer_hover;
use sections::use_section_reveal;
use video_card::VideoCard;
use web_sys::{window, ScrollBehavior, ScrollIntoViewOptions, Storage};
use yew::prelude::*;

const THEME_KEY: &str = "portfolio-theme";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Theme {
    Light,
    Dark,
}

impl Theme {
    fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn toggle_label(self) -> String {
        let next = self.toggled().as_str();
        format!("Switch to {next} theme")
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Light => "◐",
            Self::Dark => "◑",
        }
    }
}

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

fn read_stored_theme() -> Option<Theme> {
    let value = local_storage()?.get_item(THEME_KEY).ok().flatten()?;
    Theme::from_str(&value)
}

fn system_prefers_dark() -> bool {
    window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn resolve_theme() -> Theme {
    read_stored_theme().unwrap_or_else(|| {
        if system_prefers_dark() {
            Theme::Dark
        } else {
            Theme::Light
        }
    })
}

fn apply_theme(theme: Theme) {
    if let Some(document) = window().and_then(|w| w.document()) {
        if let Some(root) = document.document_element() {
            let _ = root.set_attribute("data-theme", theme.as_str());
        }
    }
}

fn persist_theme(theme: Theme) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(THEME_KEY, theme.as_str());
    }
}

fn scroll_to_section(id: &str) {
    let Some(element) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    else {
        return;
    };

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

#[function_component(App)]
fn app() -> Html {
    let theme = use_state(resolve_theme);
    let hovered = use_state_eq(|| None::<u32>);
    // Authoritative hover value; the state handle above only mirrors it into
    // the render cycle. Mount-captured callbacks read through this Rc so they
    // never observe a stale snapshot.
    let hover_model = use_mut_ref(HoverState::default);
    let active_section = use_state_eq(|| None::<&'static str>);

    {
        let current = *theme;
        use_effect_with(current, move |theme| {
            apply_theme(*theme);
            || ()
        });
    }

    let on_toggle_theme = {
        let theme = theme.clone();
        Callback::from(move |_| {
            let next = (*theme).toggled();
            persist_theme(next);
            theme.set(next);
        })
    };

    let on_hover_resolve = {
        let hovered = hovered.clone();
        let hover_model = hover_model.clone();
        use_callback((), move |resolved: Option<u32>, _| {
            let mut model = hover_model.borrow_mut();
            if model.resolve(resolved) {
                hovered.set(model.hovered());
            }
        })
    };
    use_pointer_hover(on_hover_resolve);

    let on_hover_request = {
        let hovered = hovered.clone();
        let hover_model = hover_model.clone();
        use_callback((), move |(id, over): (u32, bool), _| {
            let mut model = hover_model.borrow_mut();
            if model.request(id, over) {
                hovered.set(model.hovered());
            }
        })
    };

    let intro_ref = use_node_ref();
    let work_ref = use_node_ref();
    let connect_ref = use_node_ref();

    let on_active_section = {
        let active_section = active_section.clone();
        use_callback((), move |id: &'static str, _| {
            active_section.set(Some(id));
        })
    };
    use_section_reveal(
        vec![
            ("intro", intro_ref.clone()),
            ("work", work_ref.clone()),
            ("connect", connect_ref.clone()),
        ],
        on_active_section,
    );

    let nav_dots = SECTION_IDS
        .iter()
        .map(|section| {
            let id = *section;
            let onclick = Callback::from(move |_| scroll_to_section(id));
            html! {
                <button
                    key={id}
                    class={classes!(
                        "nav-dot",
                        (*active_section == Some(id)).then_some("is-active"),
                    )}
                    type="button"
                    aria-label={format!("Navigate to {id}")}
                    onclick={onclick}
                />
            }
        })
        .collect::<Html>();

    let cards = gallery::projects()
        .iter()
        .map(|project| {
            html! {
                <VideoCard
                    key={project.id}
                    project={project}
                    hovered={*hovered == Some(project.id)}
                    on_hover_request={on_hover_request.clone()}
                />
            }
        })
        .collect::<Html>();

    html! {
        <>
            <a class="skip-link" href="#work">{"Skip to projects"}</a>
            <nav class="section-nav" aria-label="Page sections">
                { nav_dots }
            </nav>

            <main class="page-shell">
                <header id="intro" ref={intro_ref} class="section-block section-hidden">
                    <div class="intro-grid">
                        <div class="intro-identity">
                            <div class="overline">{"PORTFOLIO / 2026"}</div>
                            <h1 class="intro-name">
                                {"William"}
                                <br />
                                <span class="intro-name-muted">{"Chen"}</span>
                            </h1>
                            <p class="intro-blurb">
                                {"Full-stack web developer with a creative edge, bringing ideas to life with software engineering."}
                            </p>
                            <div class="intro-status">
                                <span class="status-dot" aria-hidden="true"></span>
                                {"Available for work — New York, New York"}
                            </div>
                        </div>
                        <div class="intro-aside">
                            <div class="overline">{"CURRENTLY"}</div>
                            <p>{"Student @ Cornell University, graduating 2027"}</p>
                            <div class="overline">{"FOCUS"}</div>
                            <ul class="tag-list">
                                <li>{"TypeScript"}</li>
                                <li>{"React"}</li>
                                <li>{"Python"}</li>
                                <li>{"API Integration"}</li>
                            </ul>
                        </div>
                    </div>
                </header>

                <section id="work" ref={work_ref} class="section-block section-hidden" aria-labelledby="work-heading">
                    <div class="section-heading-row">
                        <h2 id="work-heading">{"Previous Experience"}</h2>
                        <div class="overline">{"2025 — 2026"}</div>
                    </div>
                    <div class="card-stack">
                        { cards }
                    </div>
                </section>

                <section id="connect" ref={connect_ref} class="section-block section-hidden" aria-labelledby="connect-heading">
                    <h2 id="connect-heading">{"Let's Connect"}</h2>
                    <p class="connect-blurb">
                        {"Always interested in new opportunities, collaborations, and conversations about technology and design."}
                    </p>
                    <ul class="connect-links">
                        <li>
                            <a href="mailto:williambillychen@gmail.com">{"williambillychen@gmail.com"}</a>
                        </li>
                        <li>
                            <a href="https://github.com/bobbybotbop" target="_blank" rel="noopener noreferrer">
                                {"GitHub"}
                                <span class="muted">{" @bobbybotbop"}</span>
                            </a>
                        </li>
                        <li>
                            <a href="https://www.linkedin.com/in/williamchenchen/" target="_blank" rel="noopener noreferrer">
                                {"LinkedIn"}
                                <span class="muted">{" williamchenchen"}</span>
                            </a>
                        </li>
                    </ul>
                </section>

                <footer class="site-footer">
                    <div class="muted">{"William Chen"}</div>
                    <button
                        class="theme-toggle"
                        type="button"
                        aria-label={(*theme).toggle_label()}
                        onclick={on_toggle_theme}
                    >
                        <span aria-hidden="true">{(*theme).icon()}</span>
                    </button>
                </footer>
            </main>
        </>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
