//! Session state machine.
//!
//! A [`Session`] owns everything the widget knows about the current input and
//! dropdown. Each transition mutates that state and returns the [`Effect`]s a
//! driver must carry out (timers, requests, repaints). Nothing here does I/O.
//!
//! Every input change and acceptance bumps a generation counter. Timer
//! firings and responses tagged with an older generation are dropped, so a
//! slow response can never overwrite a fresher dropdown.

use std::time::Duration;

use serde::Serialize;

use crate::accept;
use crate::extract::{extract, PrefixContext};
use crate::navigate::{navigate, Key, Navigation, Selection};
use crate::render::{render, Dropdown};
use crate::suggestion::{SuggestResult, Suggestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub debounce: Duration,
    pub limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(150),
            limit: 6,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SuggestQuery {
    pub prefix: String,
    pub context: String,
    pub limit: usize,
}

impl SuggestQuery {
    pub fn trending(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

/// What the frontend should paint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct View {
    pub dropdown: Dropdown,
    pub selected: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_to: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace any pending debounce timer with one for `generation`.
    ScheduleFetch { generation: u64, delay: Duration },
    CancelTimer,
    Fetch { generation: u64, query: SuggestQuery },
    Render(View),
    SetInput(String),
    ReportAcceptance(String),
    Trending { items: Vec<String>, visible: bool },
    Status(String),
}

#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    input: String,
    suggestions: Vec<Suggestion>,
    correction: Option<String>,
    dropdown: Dropdown,
    selection: Selection,
    generation: u64,
    pending_timer: Option<u64>,
    in_flight: Option<SuggestQuery>,
    trending: Vec<String>,
    trending_visible: bool,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            input: String::new(),
            suggestions: Vec::new(),
            correction: None,
            dropdown: Dropdown::hidden(),
            selection: Selection::None,
            generation: 0,
            pending_timer: None,
            in_flight: None,
            trending: Vec::new(),
            trending_visible: true,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn correction(&self) -> Option<&str> {
        self.correction.as_deref()
    }

    pub fn dropdown(&self) -> &Dropdown {
        &self.dropdown
    }

    pub fn selected(&self) -> Option<usize> {
        self.selection.index()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_pending_timer(&self) -> bool {
        self.pending_timer.is_some()
    }

    pub fn trending(&self) -> &[String] {
        &self.trending
    }

    pub fn input_changed(&mut self, value: impl Into<String>) -> Vec<Effect> {
        self.input = value.into();
        self.generation += 1;
        self.in_flight = None;

        let mut effects = Vec::new();
        if self.input.trim().is_empty() {
            self.pending_timer = None;
            self.clear();
            effects.push(Effect::CancelTimer);
            effects.push(Effect::Render(self.view(None)));
        } else {
            self.pending_timer = Some(self.generation);
            effects.push(Effect::ScheduleFetch {
                generation: self.generation,
                delay: self.config.debounce,
            });
        }
        effects.extend(self.sync_trending());
        effects
    }

    pub fn timer_fired(&mut self, generation: u64) -> Vec<Effect> {
        if self.pending_timer != Some(generation) || generation != self.generation {
            return Vec::new();
        }
        self.pending_timer = None;

        let PrefixContext { prefix, context } = extract(&self.input);
        vec![self.start_fetch(SuggestQuery {
            prefix,
            context,
            limit: self.config.limit,
        })]
    }

    pub fn response_received(&mut self, generation: u64, result: SuggestResult) -> Vec<Effect> {
        if generation != self.generation {
            return Vec::new();
        }
        let Some(query) = self.in_flight.take() else {
            return Vec::new();
        };

        self.suggestions = result.suggestions;
        self.correction = result.correction;
        self.dropdown = render(&self.suggestions, &query.prefix, self.correction.as_deref());
        self.selection = Selection::None;

        vec![
            Effect::Render(self.view(None)),
            Effect::Status(status_line(self.suggestions.len(), result.took_ms)),
        ]
    }

    pub fn key_pressed(&mut self, key: Key) -> Vec<Effect> {
        match navigate(&mut self.selection, &self.dropdown, key) {
            Navigation::Moved(index) => vec![Effect::Render(self.view(Some(index)))],
            Navigation::Accept(value) => self.accept(&value),
            Navigation::Dismiss => self.dismiss(),
            Navigation::Ignored => Vec::new(),
        }
    }

    pub fn row_clicked(&mut self, index: usize) -> Vec<Effect> {
        match self.dropdown.value_at(index).map(str::to_string) {
            Some(value) => self.accept(&value),
            None => Vec::new(),
        }
    }

    pub fn trending_clicked(&mut self, index: usize) -> Vec<Effect> {
        match self.trending.get(index).cloned() {
            Some(value) => self.accept(&value),
            None => Vec::new(),
        }
    }

    pub fn clicked_outside(&mut self) -> Vec<Effect> {
        self.dismiss()
    }

    pub fn trending_loaded(&mut self, items: Vec<String>) -> Vec<Effect> {
        self.trending = items;
        vec![Effect::Trending {
            items: self.trending.clone(),
            visible: self.trending_visible,
        }]
    }

    /// Rewrites the input with `value`, reports it and asks for completions
    /// of the next word straight away.
    pub fn accept(&mut self, value: &str) -> Vec<Effect> {
        if value.trim().is_empty() {
            return Vec::new();
        }

        let acceptance = accept::apply(&self.input, value);
        self.input = acceptance.text.clone();
        self.generation += 1;
        self.pending_timer = None;
        self.clear();

        let mut effects = vec![
            Effect::SetInput(acceptance.text),
            Effect::CancelTimer,
            Effect::Render(self.view(None)),
            Effect::ReportAcceptance(value.to_string()),
        ];
        effects.extend(self.sync_trending());
        effects.push(self.start_fetch(SuggestQuery {
            prefix: String::new(),
            context: acceptance.context,
            limit: self.config.limit,
        }));
        effects
    }

    fn dismiss(&mut self) -> Vec<Effect> {
        self.clear();
        vec![Effect::Render(self.view(None))]
    }

    fn start_fetch(&mut self, query: SuggestQuery) -> Effect {
        self.in_flight = Some(query.clone());
        Effect::Fetch {
            generation: self.generation,
            query,
        }
    }

    fn clear(&mut self) {
        self.suggestions.clear();
        self.correction = None;
        self.dropdown = Dropdown::hidden();
        self.selection = Selection::None;
    }

    fn sync_trending(&mut self) -> Option<Effect> {
        let visible = self.input.trim().is_empty();
        if visible == self.trending_visible {
            return None;
        }
        self.trending_visible = visible;
        Some(Effect::Trending {
            items: self.trending.clone(),
            visible,
        })
    }

    fn view(&self, scroll_to: Option<usize>) -> View {
        View {
            dropdown: self.dropdown.clone(),
            selected: self.selection.index(),
            scroll_to,
        }
    }
}

fn status_line(count: usize, took_ms: Option<u64>) -> String {
    let mut line = match count {
        0 => "no suggestions".to_string(),
        1 => "1 suggestion".to_string(),
        n => format!("{n} suggestions"),
    };
    if let Some(ms) = took_ms {
        line.push_str(&format!(" in {ms} ms"));
    }
    line
}
