pub mod panel;

use chrono::NaiveDate;
use data::stats;
use data::{ChartConfig, InternalError, LookupForm, LookupRequest, UserTimezone};
use exchange::fetcher::{ReqError, RequestHandler};
use exchange::{AdapterError, Candle, Interval, Profile, Stats, SymbolData};
use iced::widget::canvas::{Cache, Canvas};
use iced::widget::{center, column, container, row, text};
use iced::{Element, Length, Task};
use uuid::Uuid;

use panel::{company, metrics, toolbar};

use super::{card, skeleton};
use crate::chart::CandleChart;
use crate::modal::Dialog;
use crate::style;

const CHART_HEIGHT: f32 = 360.0;

/// Why a lookup came back empty-handed.
#[derive(thiserror::Error, Debug, Clone)]
pub enum FetchError {
    #[error("Symbol not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl From<AdapterError> for FetchError {
    fn from(error: AdapterError) -> Self {
        match error {
            AdapterError::NotFound(symbol) => FetchError::NotFound(symbol),
            other => FetchError::Internal(InternalError::Fetch(other.to_string())),
        }
    }
}

impl FetchError {
    fn dialog(&self) -> Dialog {
        match self {
            FetchError::NotFound(symbol) => Dialog::SymbolNotFound(symbol.clone()),
            FetchError::Internal(_) => Dialog::RequestFailed,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Toolbar(toolbar::Message),
    Fetched(Uuid, LookupRequest, Result<SymbolData, FetchError>),
}

/// What the application shell has to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Loaded(LookupRequest),
    Failed(Dialog),
}

pub struct Dashboard {
    form: LookupForm,
    requests: RequestHandler,
    api_base: String,
    chart_config: ChartConfig,
    loaded: Option<LookupRequest>,
    series: Vec<Candle>,
    stats: Option<Stats>,
    profile: Option<Profile>,
    last_failure: Option<Dialog>,
    cache: Cache,
}

impl Dashboard {
    pub fn new(config: &data::State) -> Self {
        Self::with_today(config, chrono::Local::now().date_naive())
    }

    fn with_today(config: &data::State, today: NaiveDate) -> Self {
        let form = match &config.last_lookup {
            Some(request) => LookupForm::from_request(request, today),
            None => LookupForm::new(today),
        };

        Self {
            form,
            requests: RequestHandler::new(),
            api_base: config.api_base.clone(),
            chart_config: config.chart,
            loaded: None,
            series: Vec::new(),
            stats: None,
            profile: None,
            last_failure: None,
            cache: Cache::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.requests.is_pending()
    }

    /// Drops cached chart geometry, e.g. after the display timezone changed.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    pub fn update(&mut self, message: Message) -> (Task<Message>, Option<Action>) {
        match message {
            Message::Toolbar(toolbar::Message::Submit) => {
                if !self.form.can_submit() {
                    return (Task::none(), None);
                }

                match self.form.submit() {
                    Ok(request) => return self.fetch(request),
                    Err(err) => {
                        log::warn!("Rejected lookup: {err}");
                        return (
                            Task::none(),
                            Some(Action::Failed(Dialog::InvalidLookup(err.to_string()))),
                        );
                    }
                }
            }
            Message::Toolbar(toolbar::Message::Reset) => self.reset(),
            Message::Toolbar(message) => toolbar::apply(&mut self.form, message),
            Message::Fetched(req_id, request, result) => {
                return (Task::none(), self.receive(req_id, request, result));
            }
        }

        (Task::none(), None)
    }

    fn fetch(&mut self, request: LookupRequest) -> (Task<Message>, Option<Action>) {
        let query = request.to_query();

        match self.requests.begin(query.clone()) {
            Ok(req_id) => {
                log::info!(
                    "Fetching {} ({}, {}) as of {}",
                    request.symbol,
                    request.range,
                    request.interval,
                    request.end
                );

                let api_base = self.api_base.clone();

                let task = Task::perform(
                    async move {
                        exchange::fetch_symbol(&api_base, &query)
                            .await
                            .map_err(FetchError::from)
                    },
                    move |result| Message::Fetched(req_id, request, result),
                );

                (task, None)
            }
            Err(ReqError::Overlaps) => {
                log::debug!("Lookup for {} is already in flight", request.symbol);
                (Task::none(), None)
            }
            Err(ReqError::Failed(reason)) => {
                log::warn!("Lookup for {} failed moments ago: {reason}", request.symbol);
                let dialog = self.last_failure.clone().unwrap_or(Dialog::RequestFailed);
                (Task::none(), Some(Action::Failed(dialog)))
            }
            Err(err) => {
                log::warn!("Skipped lookup for {}: {err}", request.symbol);
                (Task::none(), None)
            }
        }
    }

    fn receive(
        &mut self,
        req_id: Uuid,
        request: LookupRequest,
        result: Result<SymbolData, FetchError>,
    ) -> Option<Action> {
        match result {
            Ok(data) => {
                if !self.requests.complete(req_id) {
                    return None;
                }

                log::info!("Loaded {} bars for {}", data.candles.len(), request.symbol);

                self.stats = Some(
                    data.stats
                        .unwrap_or_else(|| stats::summarize(&data.candles, request.interval)),
                );
                self.profile = Some(Profile {
                    symbol: Some(request.symbol.clone()),
                    ..data.profile.unwrap_or_default()
                });
                self.series = data.candles;
                self.loaded = Some(request.clone());
                self.cache.clear();

                Some(Action::Loaded(request))
            }
            Err(err) => {
                if !self.requests.fail(req_id, err.to_string()) {
                    return None;
                }

                log::error!("Lookup for {} failed: {err}", request.symbol);

                let dialog = err.dialog();
                self.last_failure = Some(dialog.clone());
                Some(Action::Failed(dialog))
            }
        }
    }

    fn reset(&mut self) {
        self.form.reset();
        self.requests.clear();
        self.loaded = None;
        self.series.clear();
        self.stats = None;
        self.profile = None;
        self.last_failure = None;
        self.cache.clear();
    }

    fn interval(&self) -> Interval {
        self.loaded
            .as_ref()
            .map_or(self.form.interval, |request| request.interval)
    }

    pub fn view(&self, timezone: UserTimezone) -> Element<'_, Message> {
        let is_loading = self.is_loading();

        column![
            toolbar::view(&self.form, is_loading).map(Message::Toolbar),
            metrics::view(self.stats.as_ref(), self.interval(), is_loading),
            row![
                container(self.chart_card(timezone, is_loading)).width(Length::FillPortion(2)),
                container(company::view(self.profile.as_ref(), is_loading))
                    .width(Length::FillPortion(1)),
            ]
            .spacing(16),
            company::notes(self.profile.as_ref()),
        ]
        .spacing(16)
        .padding(16)
        .into()
    }

    fn chart_card(&self, timezone: UserTimezone, is_loading: bool) -> Element<'_, Message> {
        let window: Option<Element<'_, Message>> = self.loaded.as_ref().map(|request| {
            text(format!(
                "{} · {} · {} to {}",
                request.symbol,
                request.interval,
                request.start(),
                request.end
            ))
            .size(11)
            .style(style::muted_text)
            .into()
        });

        let body: Element<'_, Message> = if is_loading {
            skeleton(Length::Fill, Length::Fixed(CHART_HEIGHT))
        } else if self.series.is_empty() {
            container(center(
                text("Load a symbol to see its price history")
                    .size(12)
                    .style(style::muted_text),
            ))
            .height(CHART_HEIGHT)
            .style(style::inset)
            .into()
        } else {
            Canvas::new(CandleChart {
                series: &self.series,
                interval: self.interval(),
                timezone,
                config: self.chart_config,
                cache: &self.cache,
            })
            .width(Length::Fill)
            .height(CHART_HEIGHT)
            .into()
        };

        card("Price", window, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange::RangeOption;

    fn dashboard() -> Dashboard {
        Dashboard::with_today(
            &data::State::default(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        )
    }

    fn request() -> LookupRequest {
        LookupRequest {
            symbol: "AAPL".to_string(),
            range: RangeOption::W1,
            end: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            interval: Interval::D1,
        }
    }

    fn begin(dashboard: &mut Dashboard) -> Uuid {
        dashboard.requests.begin(request().to_query()).unwrap()
    }

    fn payload() -> SymbolData {
        SymbolData {
            stats: None,
            candles: vec![
                Candle::new(1, 100.0, 102.0, 99.0, 101.0, 10.0),
                Candle::new(2, 101.0, 104.0, 100.0, 103.0, 30.0),
            ],
            profile: None,
        }
    }

    #[test]
    fn invalid_lookup_opens_dialog() {
        let mut dashboard = dashboard();
        dashboard.update(Message::Toolbar(toolbar::Message::SymbolChanged(
            "A B".to_string(),
        )));

        let (_, action) = dashboard.update(Message::Toolbar(toolbar::Message::Submit));

        assert!(matches!(action, Some(Action::Failed(Dialog::InvalidLookup(_)))));
        assert!(!dashboard.is_loading());
    }

    #[test]
    fn blank_symbol_is_ignored() {
        let (_, action) = dashboard().update(Message::Toolbar(toolbar::Message::Submit));

        assert_eq!(action, None);
    }

    #[test]
    fn loaded_payload_fills_panels() {
        let mut dashboard = dashboard();
        let req_id = begin(&mut dashboard);
        assert!(dashboard.is_loading());

        let (_, action) = dashboard.update(Message::Fetched(req_id, request(), Ok(payload())));

        assert_eq!(action, Some(Action::Loaded(request())));
        assert!(!dashboard.is_loading());
        assert_eq!(dashboard.series.len(), 2);
        assert_eq!(dashboard.stats.unwrap().price_end, Some(103.0));
        assert_eq!(
            dashboard.profile.as_ref().and_then(|p| p.symbol.as_deref()),
            Some("AAPL")
        );
    }

    #[test]
    fn missing_symbol_maps_to_not_found() {
        let mut dashboard = dashboard();
        let req_id = begin(&mut dashboard);

        let error = FetchError::from(AdapterError::NotFound("ZZZZ".to_string()));
        let (_, action) = dashboard.update(Message::Fetched(req_id, request(), Err(error)));

        assert_eq!(
            action,
            Some(Action::Failed(Dialog::SymbolNotFound("ZZZZ".to_string())))
        );
        assert!(dashboard.series.is_empty());
    }

    #[test]
    fn retry_during_cooldown_shows_dialog_again() {
        let mut dashboard = dashboard();
        let req_id = begin(&mut dashboard);

        let error = FetchError::from(AdapterError::NotFound("AAPL".to_string()));
        dashboard.update(Message::Fetched(req_id, request(), Err(error)));

        dashboard.update(Message::Toolbar(toolbar::Message::SymbolChanged(
            "aapl".to_string(),
        )));
        let (_, action) = dashboard.update(Message::Toolbar(toolbar::Message::Submit));

        assert_eq!(
            action,
            Some(Action::Failed(Dialog::SymbolNotFound("AAPL".to_string())))
        );
        assert!(!dashboard.is_loading());
    }

    #[test]
    fn other_failures_map_to_request_failed() {
        let error = FetchError::from(AdapterError::Parse("bad json".to_string()));

        assert_eq!(error.dialog(), Dialog::RequestFailed);
    }

    #[test]
    fn responses_after_reset_are_dropped() {
        let mut dashboard = dashboard();
        let req_id = begin(&mut dashboard);

        dashboard.update(Message::Toolbar(toolbar::Message::Reset));
        let (_, action) = dashboard.update(Message::Fetched(req_id, request(), Ok(payload())));

        assert_eq!(action, None);
        assert!(dashboard.series.is_empty());
        assert!(dashboard.profile.is_none());
    }

    #[test]
    fn restores_last_lookup_into_form() {
        let config = data::State {
            last_lookup: Some(request()),
            ..data::State::default()
        };

        let dashboard =
            Dashboard::with_today(&config, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());

        assert_eq!(dashboard.form.symbol, "AAPL");
        assert_eq!(dashboard.form.end, "2024-01-05");
    }
}
