use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;
use typeahead_core::{Effect, Session, SessionConfig, SuggestResult};

use crate::identity::UserIdentity;
use crate::protocol::{FrontendEvent, FrontendResponse, ResponseBody};
use crate::reporter::AcceptanceReporter;
use crate::service::SuggestionFetcher;
use crate::trending::TrendingProvider;

/// Everything a session needs from the daemon; shared by all connections.
#[derive(Clone)]
pub struct SessionServices {
    pub config: SessionConfig,
    pub fetcher: Arc<SuggestionFetcher>,
    pub trending: Arc<TrendingProvider>,
    pub reporter: AcceptanceReporter,
    pub user: UserIdentity,
}

enum Internal {
    TimerFired(u64),
    Response { generation: u64, result: SuggestResult },
    TrendingLoaded(Vec<String>),
}

/// Starts the actor for one frontend connection. The session ends once the
/// returned sender is dropped.
pub fn spawn_session(
    services: SessionServices,
    outgoing: UnboundedSender<FrontendResponse>,
) -> (UnboundedSender<FrontendEvent>, JoinHandle<()>) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (internal_tx, internal_rx) = mpsc::unbounded_channel();
    let actor = SessionActor {
        session: Session::new(services.config),
        services,
        timer: None,
        internal_tx,
        outgoing,
    };
    let handle = tokio::spawn(actor.run(events_rx, internal_rx));
    (events_tx, handle)
}

/// Sole owner of the session state. Frontend events, timer firings and fetch
/// completions are handled one at a time on this task.
struct SessionActor {
    session: Session,
    services: SessionServices,
    timer: Option<JoinHandle<()>>,
    internal_tx: UnboundedSender<Internal>,
    outgoing: UnboundedSender<FrontendResponse>,
}

impl SessionActor {
    async fn run(
        mut self,
        mut events: UnboundedReceiver<FrontendEvent>,
        mut internal: UnboundedReceiver<Internal>,
    ) {
        self.load_trending();

        loop {
            let effects = tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.on_event(event),
                    None => break,
                },
                Some(message) = internal.recv() => self.on_internal(message),
            };
            self.apply(effects);
        }

        self.cancel_timer();
        debug!("session closed");
    }

    fn on_event(&mut self, event: FrontendEvent) -> Vec<Effect> {
        match event {
            FrontendEvent::InputChanged { value } => self.session.input_changed(value),
            FrontendEvent::KeyPressed { key } => self.session.key_pressed(key),
            FrontendEvent::RowClicked { index } => self.session.row_clicked(index),
            FrontendEvent::TrendingClicked { index } => self.session.trending_clicked(index),
            FrontendEvent::ClickedOutside => self.session.clicked_outside(),
            FrontendEvent::Ping => Vec::new(),
        }
    }

    fn on_internal(&mut self, message: Internal) -> Vec<Effect> {
        match message {
            Internal::TimerFired(generation) => self.session.timer_fired(generation),
            Internal::Response { generation, result } => {
                let effects = self.session.response_received(generation, result);
                if effects.is_empty() {
                    debug!(
                        generation,
                        current = self.session.generation(),
                        "dropped stale response"
                    );
                }
                effects
            }
            Internal::TrendingLoaded(items) => self.session.trending_loaded(items),
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleFetch { generation, delay } => {
                    self.cancel_timer();
                    let internal = self.internal_tx.clone();
                    self.timer = Some(tokio::spawn(async move {
                        sleep(delay).await;
                        let _ = internal.send(Internal::TimerFired(generation));
                    }));
                }
                Effect::CancelTimer => self.cancel_timer(),
                Effect::Fetch { generation, query } => {
                    let fetcher = self.services.fetcher.clone();
                    let user = self.services.user.clone();
                    let internal = self.internal_tx.clone();
                    tokio::spawn(async move {
                        let result = fetcher.fetch(&query, &user).await;
                        let _ = internal.send(Internal::Response { generation, result });
                    });
                }
                Effect::Render(view) => self.push(ResponseBody::View(view)),
                Effect::SetInput(value) => self.push(ResponseBody::SetInput { value }),
                Effect::ReportAcceptance(selected) => {
                    self.services.reporter.report(&self.services.user, &selected);
                }
                Effect::Trending { items, visible } => {
                    self.push(ResponseBody::Trending { items, visible })
                }
                Effect::Status(message) => self.push(ResponseBody::Status { message }),
            }
        }
    }

    fn load_trending(&self) {
        let trending = self.services.trending.clone();
        let user = self.services.user.clone();
        let internal = self.internal_tx.clone();
        tokio::spawn(async move {
            let items = trending.fetch(&user).await;
            let _ = internal.send(Internal::TrendingLoaded(items));
        });
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn push(&self, body: ResponseBody) {
        if self.outgoing.send(FrontendResponse::push(body)).is_err() {
            debug!("frontend gone, dropping update");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::service::testing::MockService;
    use crate::service::SuggestionService;
    use typeahead_core::{Key, SuggestQuery};

    struct Harness {
        service: Arc<MockService>,
        events: UnboundedSender<FrontendEvent>,
        outgoing: UnboundedReceiver<FrontendResponse>,
        handle: JoinHandle<()>,
    }

    fn start(service: MockService) -> Harness {
        let service = Arc::new(service);
        let shared: Arc<dyn SuggestionService> = service.clone();
        let services = SessionServices {
            config: SessionConfig {
                debounce: Duration::from_millis(150),
                limit: 6,
            },
            fetcher: Arc::new(SuggestionFetcher::new(shared.clone(), 0)),
            trending: Arc::new(TrendingProvider::new(shared.clone(), 10)),
            reporter: AcceptanceReporter::new(shared),
            user: UserIdentity::new("u1"),
        };
        let (tx, outgoing) = mpsc::unbounded_channel();
        let (events, handle) = spawn_session(services, tx);
        Harness {
            service,
            events,
            outgoing,
            handle,
        }
    }

    fn drain(outgoing: &mut UnboundedReceiver<FrontendResponse>) -> Vec<ResponseBody> {
        let mut bodies = Vec::new();
        while let Ok(response) = outgoing.try_recv() {
            bodies.push(response.body);
        }
        bodies
    }

    fn typed(value: &str) -> FrontendEvent {
        FrontendEvent::InputChanged {
            value: value.to_string(),
        }
    }

    fn suggestion_queries(service: &MockService) -> Vec<SuggestQuery> {
        service
            .queries()
            .into_iter()
            .filter(|query| *query != SuggestQuery::trending(10))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn pushes_trending_on_open() {
        let mut harness = start(MockService::with("", &["weather"]));
        sleep(Duration::from_millis(10)).await;

        let bodies = drain(&mut harness.outgoing);
        assert_eq!(
            bodies,
            vec![ResponseBody::Trending {
                items: vec!["weather".to_string()],
                visible: true
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn fast_typing_fetches_once() {
        let mut harness = start(MockService::with("pizz", &["pizza", "pizzeria"]));
        for value in ["p", "pi", "piz", "pizz"] {
            harness.events.send(typed(value)).unwrap();
            sleep(Duration::from_millis(50)).await;
        }
        sleep(Duration::from_millis(500)).await;

        let queries = suggestion_queries(&harness.service);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].prefix, "pizz");

        let views: Vec<_> = drain(&mut harness.outgoing)
            .into_iter()
            .filter_map(|body| match body {
                ResponseBody::View(view) => Some(view),
                _ => None,
            })
            .collect();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].dropdown.value_at(1), Some("pizzeria"));
        assert_eq!(views[0].dropdown.rows[0].highlight, "pizz");
    }

    #[tokio::test(start_paused = true)]
    async fn acceptance_reports_and_refetches() {
        let mut harness = start(MockService::with("piz", &["pizza"]));
        harness.events.send(typed("piz")).unwrap();
        sleep(Duration::from_millis(200)).await;

        harness
            .events
            .send(FrontendEvent::KeyPressed { key: Key::ArrowDown })
            .unwrap();
        harness
            .events
            .send(FrontendEvent::KeyPressed { key: Key::Enter })
            .unwrap();
        sleep(Duration::from_millis(10)).await;

        assert_eq!(
            harness.service.accepted(),
            vec![("u1".to_string(), "pizza".to_string())]
        );
        let queries = suggestion_queries(&harness.service);
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1].prefix, "");
        assert_eq!(queries[1].context, "pizza");

        let bodies = drain(&mut harness.outgoing);
        assert!(bodies.contains(&ResponseBody::SetInput {
            value: "pizza ".to_string()
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_accept_does_not_block_session() {
        let mut harness = start(MockService {
            fail_accept: true,
            ..MockService::with("ca", &["cat"])
        });
        harness.events.send(typed("ca")).unwrap();
        sleep(Duration::from_millis(200)).await;
        harness
            .events
            .send(FrontendEvent::RowClicked { index: 0 })
            .unwrap();
        sleep(Duration::from_millis(10)).await;
        drain(&mut harness.outgoing);

        harness.events.send(typed("cat ca")).unwrap();
        sleep(Duration::from_millis(200)).await;
        assert_eq!(harness.service.accepted().len(), 1);
        assert_eq!(suggestion_queries(&harness.service).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_input_cancels_pending_fetch() {
        let harness = start(MockService::default());
        harness.events.send(typed("pi")).unwrap();
        sleep(Duration::from_millis(50)).await;
        harness.events.send(typed("")).unwrap();
        sleep(Duration::from_millis(500)).await;

        assert!(suggestion_queries(&harness.service).is_empty());
    }

    #[tokio::test]
    async fn ends_when_frontend_disconnects() {
        let harness = start(MockService::default());
        drop(harness.events);
        harness.handle.await.unwrap();
    }
}
