use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Result, TravelPlannerError};
use crate::extract::extract_as;
use crate::history::HistoryStore;
use crate::models::{CurrencyInfo, HistoryRow, Itinerary, TripRequest};
use crate::planner::{GeminiPlanner, ModelClient};
use crate::presentation::{
    CurrencyView, DEFAULT_CONVERT_AMOUNT, ItineraryView, PackingSection, currency_view,
    render_itinerary,
};
use crate::prompt::{build_currency_prompt, build_itinerary_prompt};
use crate::session::{CurrentPlan, DEFAULT_IDLE_TTL, SessionRegistry};
use crate::transport::{GeminiTransport, Transport};
use crate::validation::InputValidator;

pub const PREVIOUS_PLAN_NOTICE: &str = "Showing your previously generated travel plan. Fill the form and click 'Find Travel Options' to generate a new plan.";
pub const EMPTY_HISTORY_MESSAGE: &str = "No trips saved yet. Plan a trip to see it here!";

/// Plan a Trip page: itinerary tabs plus the currency block
#[derive(Debug, Clone, Serialize)]
pub struct PlanView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub date: String,
    pub itinerary: ItineraryView,
    pub currency: CurrencyView,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TripChoice {
    pub id: u64,
    pub label: String,
}

/// Trip History page: table, selector and the id in the detail panel
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    pub trips: Vec<HistoryRow>,
    pub choices: Vec<TripChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewing: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripDetail {
    pub trip_id: u64,
    pub title: String,
    pub date: String,
    pub itinerary: ItineraryView,
    pub currency: CurrencyView,
}

/// One packing checkbox change
#[derive(Debug, Clone, Deserialize)]
pub struct PackingToggle {
    pub section: PackingSection,
    pub destination: String,
    pub item: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AboutPage {
    pub title: &'static str,
    pub how_it_works: &'static str,
    pub features: Vec<&'static str>,
    pub privacy: &'static str,
    pub version: String,
    pub built_with: &'static str,
}

/// Page-flow controller shared by every route
pub struct TravelPlannerService {
    client: Arc<dyn ModelClient>,
    validator: InputValidator,
    sessions: SessionRegistry,
    version: String,
}

impl TravelPlannerService {
    pub fn new(client: Arc<dyn ModelClient>, version: impl Into<String>) -> Self {
        Self {
            client,
            validator: InputValidator::new(),
            sessions: SessionRegistry::new(DEFAULT_IDLE_TTL),
            version: version.into(),
        }
    }

    /// Replace the session registry with one that evicts after `idle_ttl`
    pub fn with_session_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.sessions = SessionRegistry::new(idle_ttl);
        self
    }

    /// Wire the Gemini transport and planner. Fails when no API key is configured.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let transport = Arc::new(GeminiTransport::from_config(cfg)?);
        let planner =
            GeminiPlanner::new(Arc::clone(&transport) as Arc<dyn Transport>, &cfg.gemini);
        tracing::info!(
            model = %cfg.gemini.model,
            session_idle_ttl_secs = cfg.server.session_idle_ttl_secs,
            "Travel planner ready"
        );
        Ok(Self::new(Arc::new(planner), cfg.server.version.clone())
            .with_session_idle_ttl(cfg.session_idle_ttl()))
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Validate, generate and parse a new plan, look up its currency, and make it
    /// the session's current plan. The previous plan is kept when generation fails.
    pub async fn plan_trip(&self, session_id: Uuid, request: TripRequest) -> Result<PlanView> {
        self.validator.validate_trip_request(&request)?;

        let session = self.sessions.get(session_id).await?;
        let mut ctx = session.lock().await;

        tracing::info!(
            session = %session_id,
            source = %request.source,
            destination = %request.destination,
            "Generating travel plan"
        );
        let prompt = build_itinerary_prompt(&request);
        let itinerary = match self.itinerary_for(&prompt).await {
            Ok(itinerary) => itinerary,
            Err(e) => {
                tracing::error!(session = %session_id, error = %e, "Travel plan generation failed");
                return Err(e);
            }
        };

        let currency = self.lookup_currency(&request.destination).await;
        let date = request.date_text();

        let ctx = &mut *ctx;
        let current = ctx.current.insert(CurrentPlan {
            source: request.source,
            destination: request.destination,
            date,
            itinerary,
            currency,
        });

        Ok(PlanView {
            notice: None,
            date: current.date.clone(),
            itinerary: render_itinerary(
                &current.itinerary,
                &current.source,
                &current.destination,
                &mut ctx.packing,
            ),
            currency: currency_view(current.currency.as_ref(), DEFAULT_CONVERT_AMOUNT),
        })
    }

    /// Re-display the stored plan. `None` when nothing has been generated yet.
    pub async fn current_plan(&self, session_id: Uuid) -> Result<Option<PlanView>> {
        let session = self.sessions.get(session_id).await?;
        let mut guard = session.lock().await;
        let ctx = &mut *guard;

        let Some(current) = ctx.current.as_mut() else {
            return Ok(None);
        };
        if current.currency.is_none() {
            current.currency = self.lookup_currency(&current.destination).await;
        }

        Ok(Some(PlanView {
            notice: Some(PREVIOUS_PLAN_NOTICE.to_string()),
            date: current.date.clone(),
            itinerary: render_itinerary(
                &current.itinerary,
                &current.source,
                &current.destination,
                &mut ctx.packing,
            ),
            currency: currency_view(current.currency.as_ref(), DEFAULT_CONVERT_AMOUNT),
        }))
    }

    /// Copy the current plan into history. The plan stays current afterwards.
    pub async fn save_current(&self, session_id: Uuid) -> Result<u64> {
        let session = self.sessions.get(session_id).await?;
        let mut guard = session.lock().await;
        let ctx = &mut *guard;

        let current = ctx.current.as_ref().ok_or(TravelPlannerError::NoCurrentPlan)?;
        Ok(ctx.history.save(
            &current.itinerary,
            &current.source,
            &current.destination,
            &current.date,
        ))
    }

    /// Currency block for the current plan at a different USD amount
    pub async fn convert_currency(
        &self,
        session_id: Uuid,
        amount_usd: f64,
    ) -> Result<CurrencyView> {
        if !amount_usd.is_finite() || amount_usd < 0.0 {
            return Err(TravelPlannerError::InvalidInput(format!(
                "Amount must be a non-negative number, got {amount_usd}"
            )));
        }

        let session = self.sessions.get(session_id).await?;
        let ctx = session.lock().await;
        let current = ctx.current.as_ref().ok_or(TravelPlannerError::NoCurrentPlan)?;
        Ok(currency_view(current.currency.as_ref(), amount_usd))
    }

    pub async fn set_packing_item(
        &self,
        session_id: Uuid,
        toggle: PackingToggle,
    ) -> Result<bool> {
        let session = self.sessions.get(session_id).await?;
        let mut ctx = session.lock().await;
        ctx.packing
            .set(toggle.section, &toggle.destination, &toggle.item, toggle.checked);
        Ok(toggle.checked)
    }

    pub async fn history(&self, session_id: Uuid) -> Result<HistoryPage> {
        let session = self.sessions.get(session_id).await?;
        let ctx = session.lock().await;
        Ok(history_page(&ctx.history, ctx.viewing))
    }

    /// Open a saved trip in the detail panel. `None` when the id is unknown.
    pub async fn view_trip(&self, session_id: Uuid, trip_id: u64) -> Result<Option<TripDetail>> {
        let session = self.sessions.get(session_id).await?;
        let mut guard = session.lock().await;
        let ctx = &mut *guard;

        let Some(trip) = ctx.history.get(trip_id) else {
            return Ok(None);
        };
        ctx.viewing = Some(trip_id);

        let currency = self.lookup_currency(&trip.destination).await;
        Ok(Some(TripDetail {
            trip_id,
            title: format!("Trip Details: {} → {}", trip.source, trip.destination),
            date: trip.date.clone(),
            itinerary: render_itinerary(
                &trip.itinerary,
                &trip.source,
                &trip.destination,
                &mut ctx.packing,
            ),
            currency: currency_view(currency.as_ref(), DEFAULT_CONVERT_AMOUNT),
        }))
    }

    pub async fn close_trip_view(&self, session_id: Uuid) -> Result<()> {
        let session = self.sessions.get(session_id).await?;
        session.lock().await.viewing = None;
        Ok(())
    }

    /// Remove a saved trip. Closes the detail panel if it showed that trip.
    pub async fn delete_trip(&self, session_id: Uuid, trip_id: u64) -> Result<bool> {
        let session = self.sessions.get(session_id).await?;
        let mut ctx = session.lock().await;

        let deleted = ctx.history.delete(trip_id);
        if deleted && ctx.viewing == Some(trip_id) {
            ctx.viewing = None;
        }
        Ok(deleted)
    }

    pub fn about(&self) -> AboutPage {
        AboutPage {
            title: "About AI Travel Planner Pro",
            how_it_works: "This AI-powered travel planner uses Google's Generative AI to provide comprehensive travel options between any two locations. It analyzes flights, trains, buses, and cabs to help you make an informed decision.",
            features: vec![
                "Multiple Transportation Options: Compare flights, trains, buses, and cabs",
                "Destination Information: Weather forecasts, attractions, and local transport details",
                "Cost Comparisons: Price comparison between different travel methods",
                "Trip History: Save and review your planned trips",
                "Packing Suggestions: Customized packing recommendations based on your destination",
                "Currency Conversion: Quick currency reference for your destination",
            ],
            privacy: "Travel plans are never written to disk. Saved trips live only as long as your session.",
            version: format!("AI Travel Planner Pro v{}", self.version),
            built_with: "Built with axum, reqwest, and Google Gemini",
        }
    }

    async fn itinerary_for(&self, prompt: &str) -> Result<Itinerary> {
        let raw = self.client.generate_itinerary(prompt).await?;
        extract_as::<Itinerary>(&raw)
    }

    /// Currency lookup never fails the caller; problems are logged and reported as unavailable
    async fn lookup_currency(&self, destination: &str) -> Option<CurrencyInfo> {
        let prompt = build_currency_prompt(destination);
        let result = match self.client.generate_currency(&prompt).await {
            Ok(raw) => extract_as::<CurrencyInfo>(&raw),
            Err(e) => Err(e),
        };

        match result {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!(
                    destination,
                    error = %e,
                    raw = e.raw_response().unwrap_or(""),
                    "Could not load currency information"
                );
                None
            }
        }
    }
}

fn history_page(history: &HistoryStore, viewing: Option<u64>) -> HistoryPage {
    let choices = history
        .ids()
        .into_iter()
        .filter_map(|id| history.label(id).map(|label| TripChoice { id, label }))
        .collect();

    HistoryPage {
        trips: history.as_table(),
        choices,
        viewing,
        message: history
            .is_empty()
            .then(|| EMPTY_HISTORY_MESSAGE.to_string()),
    }
}
