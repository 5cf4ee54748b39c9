//! Core state for the hover-preview project gallery.
//!
//! Everything in this module is plain Rust with no DOM types so the hover
//! logic can be exercised under `cargo test` on the host. The wasm side
//! (`crate::frontend`) only wires these pieces to browser events.

use std::collections::BTreeSet;

/// Collapsed card height in CSS pixels. Must match `.video-card` in styles.css.
pub const CARD_COLLAPSED_HEIGHT: f64 = 162.0;
/// Expanded card height in CSS pixels. Must match `.video-card.is-expanded`.
pub const CARD_EXPANDED_HEIGHT: f64 = 405.0;
/// Duration of the collapse/expand height transition in milliseconds.
pub const CARD_TRANSITION_MS: f64 = 800.0;

/// Page sections observed for nav-dot highlighting, in document order.
pub const SECTION_IDS: [&str; 3] = ["intro", "work", "connect"];

/// A single project entry rendered as a hoverable, expandable card.
#[derive(Debug, PartialEq)]
pub struct Project {
    pub id: u32,
    pub year: &'static str,
    pub name: &'static str,
    pub company: &'static str,
    pub description: &'static str,
    pub tech: &'static [&'static str],
    pub thumbnail: &'static str,
    pub video: &'static str,
    pub github_url: Option<&'static str>,
    pub more_info_url: Option<&'static str>,
}

const PROJECTS: &[Project] = &[
    Project {
        id: 1,
        year: "2026",
        name: "AXIS RESEARCHER",
        company: "Personal Project",
        description: "End-to-end eBay automation pipeline that researches products, \
            generates listing copy and photos, and publishes autonomously.",
        tech: &["Python", "eBay API", "AI", "Automation"],
        thumbnail: "/thumbnails/axis.jpg",
        video: "/videos/axis.mp4",
        github_url: Some("https://github.com/bobbybotbop/AxisResearcher"),
        more_info_url: None,
    },
    Project {
        id: 2,
        year: "2025",
        name: "ANYCARD",
        company: "Cornell DTI Trends Final Project",
        description: "Full-stack platform with AI-generated trading cards, 3D pack \
            opening animations, image search and trading.",
        tech: &["React", "Three.js", "Claude API", "Node.js"],
        thumbnail: "/thumbnails/anycard.jpg",
        video: "/videos/anycard.mp4",
        github_url: Some("https://github.com/bobbybotbop/AnyCard"),
        more_info_url: None,
    },
    Project {
        id: 3,
        year: "2025",
        name: "MEMORY BOX",
        company: "Hawl Technologies Intern",
        description: "Chrome extension aggregating multi-platform LLM conversations \
            with semantic search and cloud sync.",
        tech: &["TypeScript", "Chrome Extension", "Semantic Search"],
        thumbnail: "/thumbnails/memorybox.jpg",
        video: "/videos/memorybox.mp4",
        github_url: None,
        more_info_url: None,
    },
    Project {
        id: 4,
        year: "2025",
        name: "BOND BUDDY",
        company: "Personal Project",
        description: "Desktop pet app with draggable UI, tray integration and custom \
            image support.",
        tech: &["Electron", "React", "TypeScript"],
        thumbnail: "/thumbnails/bondbuddy.jpg",
        video: "/videos/bondbuddy.mp4",
        github_url: Some("https://github.com/bobbybotbop/BondBuddy"),
        more_info_url: None,
    },
    Project {
        id: 5,
        year: "2025",
        name: "DATAVISION",
        company: "Bitcamp Hackathon Project",
        description: "Agentic data platform for automated statistical analysis, \
            hypothesis testing and real-time visualization.",
        tech: &["Python", "LangGraph", "Gemini API", "Statistics"],
        thumbnail: "/thumbnails/datavision.jpg",
        video: "/videos/datavision.mp4",
        github_url: Some("https://github.com/aadia1234/DataVision"),
        more_info_url: None,
    },
    Project {
        id: 6,
        year: "2025",
        name: "HOBBYSWAP",
        company: "Personal Project",
        description: "Social platform with recommendation algorithms, user profiles \
            and real-time messaging for skill exchange.",
        tech: &["React", "Node.js", "WebSocket"],
        thumbnail: "/thumbnails/hobbyswap.jpg",
        video: "/videos/hobbyswap.mp4",
        github_url: Some("https://github.com/bobbybotbop/HobbySwap"),
        more_info_url: None,
    },
];

/// The fixed, ordered project list shown in the work section.
pub fn projects() -> &'static [Project] {
    PROJECTS
}

/// Parses a `data-card-id` attribute value. Ids are positive integers; anything
/// else resolves to no card.
pub fn parse_card_id(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|id| *id > 0)
}

/// Normalizes a card's rendered height into expansion progress in `[0, 1]`.
pub fn expansion_progress(rendered_height: f64) -> f64 {
    let span = CARD_EXPANDED_HEIGHT - CARD_COLLAPSED_HEIGHT;
    ((rendered_height - CARD_COLLAPSED_HEIGHT) / span).clamp(0.0, 1.0)
}

/// Coalesces raw pointer-move and scroll signals into at most one hit-test per
/// animation frame. `record_*` return `true` when a frame callback still needs
/// to be scheduled; `take_frame` consumes the pending flag and yields the most
/// recent coordinates, so a frame never observes an intermediate sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointerSampler {
    x: i32,
    y: i32,
    pending: bool,
}

impl PointerSampler {
    pub fn record_move(&mut self, x: i32, y: i32) -> bool {
        self.x = x;
        self.y = y;
        self.arm()
    }

    /// Scroll moves the content under a stationary pointer, so it re-runs the
    /// hit-test at the last known coordinates.
    pub fn record_scroll(&mut self) -> bool {
        self.arm()
    }

    fn arm(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn take_frame(&mut self) -> (i32, i32) {
        self.pending = false;
        (self.x, self.y)
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// Capability to resolve which card, if any, occupies a point on the rendering
/// surface. The production impl wraps `document.elementFromPoint`; tests use a
/// rectangle list.
pub trait HitTest {
    fn card_at(&self, x: i32, y: i32) -> Option<u32>;
}

/// Runs one coalesced hit-test frame against a surface.
pub fn resolve_hover<H: HitTest>(sampler: &mut PointerSampler, surface: &H) -> Option<u32> {
    let (x, y) = sampler.take_frame();
    surface.card_at(x, y)
}

/// The single authoritative "which card is hovered" value.
///
/// Two paths mutate it: the frame-coalesced hit-test (`resolve`) and each
/// card's own mouseenter/mouseleave (`request`). Both run on the UI thread and
/// are last-write-wins, except that a stale unhover from a card that already
/// lost focus must not clear a newer hover.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HoverState {
    hovered: Option<u32>,
}

impl HoverState {
    pub fn with_hovered(hovered: Option<u32>) -> Self {
        Self { hovered }
    }

    pub fn hovered(&self) -> Option<u32> {
        self.hovered
    }

    /// Applies the hit-test result for a frame. Returns `true` if the hovered
    /// id changed.
    pub fn resolve(&mut self, resolved: Option<u32>) -> bool {
        if self.hovered == resolved {
            return false;
        }
        self.hovered = resolved;
        true
    }

    /// Applies a direct enter/leave request from a card's own region. Returns
    /// `true` if the hovered id changed.
    pub fn request(&mut self, id: u32, hovered: bool) -> bool {
        if hovered {
            return self.resolve(Some(id));
        }
        if self.hovered != Some(id) {
            // Stale unhover from a card that already lost focus.
            return false;
        }
        self.hovered = None;
        true
    }
}

/// Playback side effect of a card phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    /// Seek to the start, then begin playback.
    RestartAndPlay,
    /// Pause playback and seek back to the start.
    PauseAndRewind,
}

/// Per-card collapsed/expanded state machine. Transitions are driven by
/// whether this card's id matches the hovered id; re-applying the current
/// phase issues no command, so an already-expanded card is never rewound.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    #[default]
    Collapsed,
    Expanded,
}

impl CardPhase {
    pub fn transition(&mut self, hovered: bool) -> Option<PlaybackCommand> {
        match (*self, hovered) {
            (Self::Collapsed, true) => {
                *self = Self::Expanded;
                Some(PlaybackCommand::RestartAndPlay)
            }
            (Self::Expanded, false) => {
                *self = Self::Collapsed;
                Some(PlaybackCommand::PauseAndRewind)
            }
            _ => None,
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self, Self::Expanded)
    }
}

/// Result of feeding one intersection event into [`SectionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionUpdate {
    /// The section crossed the visibility threshold for the first time and
    /// should receive its one-time reveal treatment.
    pub first_reveal: bool,
    /// The active section for nav highlighting changed.
    pub activated: bool,
}

/// Tracks which section is active and which have already been revealed.
#[derive(Debug, Default)]
pub struct SectionState {
    active: Option<&'static str>,
    revealed: BTreeSet<&'static str>,
}

impl SectionState {
    pub fn active(&self) -> Option<&'static str> {
        self.active
    }

    /// Records that a section crossed the visibility threshold.
    pub fn intersected(&mut self, id: &'static str) -> SectionUpdate {
        let first_reveal = self.revealed.insert(id);
        let activated = self.active != Some(id);
        self.active = Some(id);
        SectionUpdate {
            first_reveal,
            activated,
        }
    }

    /// Mount-time check for sections already in the viewport before the
    /// observer fires. Reveals without changing the active section.
    pub fn reveal_only(&mut self, id: &'static str) -> bool {
        self.revealed.insert(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RectSurface {
        // (id, left, top, right, bottom)
        cards: Vec<(u32, i32, i32, i32, i32)>,
    }

    impl HitTest for RectSurface {
        fn card_at(&self, x: i32, y: i32) -> Option<u32> {
            self.cards
                .iter()
                .find(|(_, l, t, r, b)| x > *l && x < *r && y > *t && y < *b)
                .map(|(id, ..)| *id)
        }
    }

    fn stacked_cards() -> RectSurface {
        RectSurface {
            cards: vec![
                (1, 0, 0, 400, 160),
                (2, 0, 170, 400, 330),
                (3, 0, 340, 400, 500),
            ],
        }
    }

    fn expanded_ids(phases: &mut [(u32, CardPhase)], hovered: Option<u32>) -> Vec<u32> {
        for (id, phase) in phases.iter_mut() {
            phase.transition(hovered == Some(*id));
        }
        phases
            .iter()
            .filter(|(_, phase)| phase.is_expanded())
            .map(|(id, _)| *id)
            .collect()
    }

    #[test]
    fn pointer_outside_every_card_resolves_none() {
        let surface = stacked_cards();
        let mut sampler = PointerSampler::default();
        sampler.record_move(500, 50);
        assert_eq!(resolve_hover(&mut sampler, &surface), None);
    }

    #[test]
    fn pointer_inside_one_card_resolves_that_card() {
        let surface = stacked_cards();
        let mut sampler = PointerSampler::default();
        sampler.record_move(200, 250);
        assert_eq!(resolve_hover(&mut sampler, &surface), Some(2));
    }

    #[test]
    fn sampler_coalesces_moves_into_one_frame() {
        let mut sampler = PointerSampler::default();
        assert!(sampler.record_move(10, 10));
        assert!(!sampler.record_move(20, 20));
        assert!(!sampler.record_scroll());
        // The frame sees only the latest sample.
        assert_eq!(sampler.take_frame(), (20, 20));
        // Next signal schedules a fresh frame.
        assert!(sampler.record_scroll());
    }

    #[test]
    fn scroll_reuses_last_known_position() {
        let surface = stacked_cards();
        let mut sampler = PointerSampler::default();
        sampler.record_move(200, 50);
        sampler.take_frame();
        sampler.record_scroll();
        assert_eq!(resolve_hover(&mut sampler, &surface), Some(1));
    }

    #[test]
    fn at_most_one_card_expanded_for_any_hover_sequence() {
        let mut phases: Vec<(u32, CardPhase)> =
            (1..=5).map(|id| (id, CardPhase::default())).collect();
        let sequence = [
            Some(1),
            Some(3),
            Some(3),
            None,
            Some(5),
            Some(2),
            None,
            None,
            Some(4),
        ];
        for hovered in sequence {
            let expanded = expanded_ids(&mut phases, hovered);
            assert!(expanded.len() <= 1, "expanded set {expanded:?}");
            assert_eq!(expanded.first().copied(), hovered);
        }
    }

    #[test]
    fn expanding_an_expanded_card_issues_no_command() {
        let mut phase = CardPhase::default();
        assert_eq!(phase.transition(true), Some(PlaybackCommand::RestartAndPlay));
        assert_eq!(phase.transition(true), None);
        assert!(phase.is_expanded());
    }

    #[test]
    fn collapse_after_expand_pauses_and_rewinds() {
        let mut phase = CardPhase::default();
        phase.transition(true);
        assert_eq!(phase.transition(false), Some(PlaybackCommand::PauseAndRewind));
        assert_eq!(phase.transition(false), None);
    }

    #[test]
    fn progress_is_exact_at_height_bounds_and_clamped_beyond() {
        assert_eq!(expansion_progress(CARD_COLLAPSED_HEIGHT), 0.0);
        assert_eq!(expansion_progress(CARD_EXPANDED_HEIGHT), 1.0);
        assert_eq!(expansion_progress(CARD_COLLAPSED_HEIGHT - 40.0), 0.0);
        assert_eq!(expansion_progress(CARD_EXPANDED_HEIGHT + 40.0), 1.0);
        let mid = expansion_progress((CARD_COLLAPSED_HEIGHT + CARD_EXPANDED_HEIGHT) / 2.0);
        assert!((mid - 0.5).abs() < 1e-9);
    }

    #[test]
    fn stale_unhover_does_not_clear_a_newer_hover() {
        let mut state = HoverState::default();
        assert!(state.request(2, true));
        assert!(state.request(3, true));
        // Card 2's mouseleave arrives after card 3 took over.
        assert!(!state.request(2, false));
        assert_eq!(state.hovered(), Some(3));
        assert!(state.request(3, false));
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn resolver_none_collapses_current_hover() {
        let mut state = HoverState::with_hovered(Some(4));
        assert!(state.resolve(None));
        assert_eq!(state.hovered(), None);
        assert!(!state.resolve(None));
    }

    #[test]
    fn direct_enter_then_frame_resolve_hands_off_between_cards() {
        let mut state = HoverState::default();
        let mut phases: Vec<(u32, CardPhase)> =
            (1..=5).map(|id| (id, CardPhase::default())).collect();

        // Pointer enters card 3's region directly, no movement elsewhere.
        assert!(state.request(3, true));
        let expanded = expanded_ids(&mut phases, state.hovered());
        assert_eq!(expanded, vec![3]);

        // Pointer moves over card 5; the coalesced hit-test resolves on the
        // next frame.
        assert!(state.resolve(Some(5)));
        let commands: Vec<_> = phases
            .iter_mut()
            .map(|(id, phase)| (*id, phase.transition(state.hovered() == Some(*id))))
            .collect();
        assert!(commands.contains(&(3, Some(PlaybackCommand::PauseAndRewind))));
        assert!(commands.contains(&(5, Some(PlaybackCommand::RestartAndPlay))));
        let expanded: Vec<u32> = phases
            .iter()
            .filter(|(_, phase)| phase.is_expanded())
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(expanded, vec![5]);
    }

    #[test]
    fn section_reveals_exactly_once_across_repeated_crossings() {
        let mut sections = SectionState::default();
        let first = sections.intersected("work");
        assert!(first.first_reveal);
        assert!(first.activated);
        assert_eq!(sections.active(), Some("work"));

        let again = sections.intersected("connect");
        assert!(again.first_reveal);
        let back = sections.intersected("work");
        assert!(!back.first_reveal, "reveal treatment must not repeat");
        assert!(back.activated);
    }

    #[test]
    fn mount_time_reveal_does_not_change_active_section() {
        let mut sections = SectionState::default();
        assert!(sections.reveal_only("intro"));
        assert_eq!(sections.active(), None);
        // Observer firing later still activates but does not re-reveal.
        let update = sections.intersected("intro");
        assert!(!update.first_reveal);
        assert!(update.activated);
    }

    #[test]
    fn card_id_attribute_parsing_rejects_non_positive_values() {
        assert_eq!(parse_card_id("3"), Some(3));
        assert_eq!(parse_card_id(" 12 "), Some(12));
        assert_eq!(parse_card_id("0"), None);
        assert_eq!(parse_card_id("-2"), None);
        assert_eq!(parse_card_id("abc"), None);
        assert_eq!(parse_card_id(""), None);
    }

    #[test]
    fn project_ids_are_unique_and_ordered() {
        let ids: Vec<u32> = projects().iter().map(|p| p.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }
}
