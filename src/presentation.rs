//! View models for a parsed itinerary.
//!
//! Widgets and charts are drawn by the client; this module only derives what
//! they show: the four result tabs, the price comparison series, the packing
//! list with its per-session checklist, and the currency converter block.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{
    Accommodation, CurrencyInfo, Itinerary, TransportCategory, TransportOption,
};

pub const NO_OPTIONS: &str = "No options available.";
pub const CURRENCY_UNAVAILABLE: &str = "Currency information unavailable";
pub const DEFAULT_CONVERT_AMOUNT: f64 = 100.0;

const ESSENTIAL_ITEMS: [&str; 5] = [
    "Passport/ID",
    "Phone & charger",
    "Wallet & credit cards",
    "Medication (if needed)",
    "Toiletries",
];
const RAIN_ITEMS: [&str; 3] = ["Umbrella", "Waterproof jacket", "Waterproof shoes"];
const HOT_ITEMS: [&str; 5] = [
    "Sunscreen",
    "Sunglasses",
    "Hat",
    "Light clothing",
    "Water bottle",
];
const COLD_ITEMS: [&str; 5] = [
    "Warm jacket",
    "Gloves",
    "Scarf",
    "Boots",
    "Thermal layers",
];

// ───────────────────────────────────────────────────────────────────────────────
// Price comparison
// ───────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PricePoint {
    pub transportation: String,
    pub estimated_cost: f64,
}

/// Low end of a cost text: "$120-180" → 120.0, "₹5,000" → 5000.0, "N/A" → 0.0
pub fn parse_low_price(cost: &str) -> f64 {
    let low = cost.split('-').next().unwrap_or(cost);
    let digits: String = low
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(0.0)
}

/// One bar per category that has options, priced from its first option
pub fn price_comparison(itinerary: &Itinerary) -> Vec<PricePoint> {
    TransportCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let first = itinerary.travel_options.get(category).first()?;
            Some(PricePoint {
                transportation: category.label().to_string(),
                estimated_cost: parse_low_price(&first.cost),
            })
        })
        .collect()
}

// ───────────────────────────────────────────────────────────────────────────────
// Packing list
// ───────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingSection {
    Essential,
    Weather,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PackingList {
    pub essentials: Vec<String>,
    pub weather: Vec<String>,
}

/// Essentials always; weather sets fire independently on keywords
pub fn packing_list(weather: &str) -> PackingList {
    let weather = weather.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| weather.contains(w));

    let mut weather_items: Vec<&str> = Vec::new();
    if mentions(&["rain", "shower"]) {
        weather_items.extend(RAIN_ITEMS);
    }
    if mentions(&["hot", "warm", "sunny"]) {
        weather_items.extend(HOT_ITEMS);
    }
    if mentions(&["cold", "cool", "snow"]) {
        weather_items.extend(COLD_ITEMS);
    }

    PackingList {
        essentials: ESSENTIAL_ITEMS.iter().map(|s| s.to_string()).collect(),
        weather: weather_items.into_iter().map(str::to_string).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ChecklistKey {
    section: PackingSection,
    destination: String,
    item: String,
}

/// Session-scoped packing checkboxes keyed by (section, destination, item)
#[derive(Debug, Default, Clone)]
pub struct PackingChecklist {
    checked: HashMap<ChecklistKey, bool>,
}

impl PackingChecklist {
    fn key(section: PackingSection, destination: &str, item: &str) -> ChecklistKey {
        ChecklistKey {
            section,
            destination: destination.to_string(),
            item: item.to_string(),
        }
    }

    /// Current state, registering the key as unchecked the first time it is seen
    pub fn state(&mut self, section: PackingSection, destination: &str, item: &str) -> bool {
        *self
            .checked
            .entry(Self::key(section, destination, item))
            .or_insert(false)
    }

    pub fn set(&mut self, section: PackingSection, destination: &str, item: &str, checked: bool) {
        self.checked
            .insert(Self::key(section, destination, item), checked);
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PackingItemView {
    pub section: PackingSection,
    pub item: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PackingView {
    pub essentials: Vec<PackingItemView>,
    pub weather: Vec<PackingItemView>,
}

fn packing_view(
    list: &PackingList,
    destination: &str,
    checklist: &mut PackingChecklist,
) -> PackingView {
    let mut items = |section: PackingSection, labels: &[String]| {
        labels
            .iter()
            .map(|item| PackingItemView {
                section,
                item: item.clone(),
                checked: checklist.state(section, destination, item),
            })
            .collect::<Vec<_>>()
    };

    PackingView {
        essentials: items(PackingSection::Essential, &list.essentials),
        weather: items(PackingSection::Weather, &list.weather),
    }
}

// ───────────────────────────────────────────────────────────────────────────────
// Currency converter
// ───────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Conversion {
    pub amount_usd: f64,
    pub converted: f64,
    pub currency_code: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CurrencyView {
    Available {
        local_currency: String,
        exchange_rate: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        conversion: Option<Conversion>,
    },
    Unavailable {
        message: String,
    },
}

/// Numeric rate from "1 USD = 0.92 Euro"
pub fn parse_exchange_rate(exchange_rate: &str) -> Option<f64> {
    let (_, rhs) = exchange_rate.split_once('=')?;
    let digits: String = rhs
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().ok()
}

/// Code from "Euro (EUR)"
pub fn parse_currency_code(local_currency: &str) -> Option<String> {
    let (_, after) = local_currency.split_once('(')?;
    let (code, _) = after.split_once(')')?;
    let code = code.trim();
    (!code.is_empty()).then(|| code.to_string())
}

pub fn convert(info: &CurrencyInfo, amount_usd: f64) -> Option<Conversion> {
    let rate = parse_exchange_rate(&info.exchange_rate)?;
    let code = parse_currency_code(&info.local_currency)?;
    let converted = amount_usd * rate;
    Some(Conversion {
        amount_usd,
        converted,
        summary: format!("${amount_usd:.2} USD = {converted:.2} {code}"),
        currency_code: code,
    })
}

pub fn currency_view(info: Option<&CurrencyInfo>, amount_usd: f64) -> CurrencyView {
    match info {
        Some(info) => CurrencyView::Available {
            local_currency: info.local_currency.clone(),
            exchange_rate: info.exchange_rate.clone(),
            conversion: convert(info, amount_usd),
        },
        None => CurrencyView::Unavailable {
            message: CURRENCY_UNAVAILABLE.to_string(),
        },
    }
}

// ───────────────────────────────────────────────────────────────────────────────
// Result tabs
// ───────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OptionsSection {
    pub category: TransportCategory,
    pub title: String,
    pub expanded: bool,
    pub options: Vec<TransportOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TravelOptionsTab {
    pub recommendation: String,
    pub sections: Vec<OptionsSection>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DestinationTab {
    pub weather: String,
    /// Numbered for display, e.g. "1. Griffith Observatory"
    pub attractions: Vec<String>,
    pub accommodations: Vec<Accommodation>,
    pub local_transport: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonTab {
    pub title: String,
    pub prices: Vec<PricePoint>,
    pub estimated_total_cost: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItineraryView {
    pub source: String,
    pub destination: String,
    pub travel_options: TravelOptionsTab,
    pub destination_info: DestinationTab,
    pub comparison: ComparisonTab,
    pub packing: PackingView,
}

pub fn travel_options_tab(itinerary: &Itinerary) -> TravelOptionsTab {
    let sections = TransportCategory::ALL
        .into_iter()
        .map(|category| {
            let options = itinerary.travel_options.get(category).to_vec();
            OptionsSection {
                category,
                title: format!("{} Options", category.label()),
                expanded: category == TransportCategory::Flights,
                empty_message: options.is_empty().then(|| NO_OPTIONS.to_string()),
                options,
            }
        })
        .collect();

    TravelOptionsTab {
        recommendation: itinerary.recommendation.clone(),
        sections,
    }
}

pub fn destination_tab(itinerary: &Itinerary) -> DestinationTab {
    let info = &itinerary.destination_info;
    DestinationTab {
        weather: info.weather.clone(),
        attractions: info
            .attractions
            .iter()
            .enumerate()
            .map(|(idx, a)| format!("{}. {}", idx + 1, a))
            .collect(),
        accommodations: info.accommodations.clone(),
        local_transport: info.local_transport.clone(),
    }
}

/// All four tabs. Registers unseen packing items as unchecked in `checklist`.
pub fn render_itinerary(
    itinerary: &Itinerary,
    source: &str,
    destination: &str,
    checklist: &mut PackingChecklist,
) -> ItineraryView {
    let list = packing_list(&itinerary.destination_info.weather);

    ItineraryView {
        source: source.to_string(),
        destination: destination.to_string(),
        travel_options: travel_options_tab(itinerary),
        destination_info: destination_tab(itinerary),
        comparison: ComparisonTab {
            title: "Price Comparison by Transportation Method".to_string(),
            prices: price_comparison(itinerary),
            estimated_total_cost: itinerary.estimated_total_cost.clone(),
        },
        packing: packing_view(&list, destination, checklist),
    }
}
