use crate::config::{DeckConfig, Features, DECK_CAP};
use crate::deck::Deck;
use crate::models::{shown, Card};
use std::collections::BTreeSet;

/// Most cards shown from one result set
pub const RESULT_LIMIT: usize = 20;

/// Effect preview length when the full tooltip is disabled
pub const EFFECT_PREVIEW_CHARS: usize = 120;

/// "Showing 20 of N cards" when the listing is cut, else "N card(s)"
pub fn result_count_label(total: usize) -> String {
    let visible = total.min(RESULT_LIMIT);
    if total > visible {
        format!("Showing {visible} of {total} cards")
    } else if total == 1 {
        "1 card".to_string()
    } else {
        format!("{total} cards")
    }
}

/// Badge texts for a result card: number, rarity, feature, type, level, round
pub fn card_badges(card: &Card) -> Vec<String> {
    let mut badges = vec![shown(&card.number).unwrap_or_else(|| "N/A".to_string())];
    for text in [&card.rarity, &card.feature, &card.card_type]
        .into_iter()
        .flatten()
        .filter(|t| !t.is_empty())
    {
        badges.push(text.clone());
    }
    if let Some(level) = shown(&card.level) {
        badges.push(format!("Level {level}"));
    }
    if let Some(round) = shown(&card.round) {
        badges.push(format!("Round {round}"));
    }
    badges
}

/// Cut `text` to `max` chars, marking the cut with `…`
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}…", &text[..end]),
        None => text.to_string(),
    }
}

/// Detail lines under a result: battle power table and effect text
pub fn effect_lines(card: &Card, features: &Features) -> Vec<String> {
    let effect = card.effect.as_deref().filter(|e| !e.is_empty());
    if !features.effect_tooltip {
        return vec![match effect {
            Some(effect) => truncate_chars(effect, EFFECT_PREVIEW_CHARS),
            None => "No effect text.".to_string(),
        }];
    }

    let mut lines = Vec::new();
    let stats = card.battle_power_stats();
    if !stats.is_empty() {
        let table: Vec<String> = stats
            .iter()
            .map(|(label, value)| format!("{label} {value}"))
            .collect();
        lines.push(table.join(" | "));
    }
    lines.push(effect.unwrap_or("No effect text.").to_string());
    lines
}

pub fn format_results(cards: &[Card], features: &Features) -> String {
    let mut output = String::new();
    output.push_str(&result_count_label(cards.len()));
    output.push('\n');

    if cards.is_empty() {
        output.push_str("No cards matched these filters. Try broadening your search.\n");
        return output;
    }

    for card in cards.iter().take(RESULT_LIMIT) {
        let title = card.name.as_deref().filter(|n| !n.is_empty());
        output.push('\n');
        output.push_str(title.unwrap_or("Unnamed Card"));
        if let Some(key) = card.key() {
            output.push_str(&format!("  (add with: {key})"));
        }
        output.push('\n');

        let badges: Vec<String> = card_badges(card).iter().map(|b| format!("[{b}]")).collect();
        output.push_str(&format!("    {}\n", badges.join(" ")));
        for line in effect_lines(card, features) {
            output.push_str(&format!("    {line}\n"));
        }
    }

    output
}

pub fn format_deck(deck: &Deck, config: &DeckConfig) -> String {
    let mut output = String::new();

    if deck.is_empty() {
        output.push_str("No cards yet. Add from the results to start building.\n");
    }

    // Align the count column on the widest meta line
    let rows: Vec<(String, String, String)> = deck
        .iter()
        .map(|(key, entry)| {
            let limit = config.limit_for_card(&entry.card, key);
            (
                entry.card.display_name().to_string(),
                entry.card.identity_line(" • "),
                format!("{}/{}", entry.count, limit),
            )
        })
        .collect();
    let meta_width = rows
        .iter()
        .map(|(_, meta, _)| meta.chars().count())
        .max()
        .unwrap_or(0);

    for (name, meta, counter) in &rows {
        let padding = meta_width - meta.chars().count();
        output.push_str(&format!("{name}\n"));
        output.push_str(&format!("    {meta}{}  {counter}\n", " ".repeat(padding)));
    }

    output.push_str(&format!(
        "\n{} / {}  |  {} unique\n",
        deck.total_count(),
        DECK_CAP,
        deck.unique_count()
    ));
    output
}

/// Distinct values offered for the listing filters, derived from results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub rarities: Vec<String>,
    pub features: Vec<String>,
    pub types: Vec<String>,
    pub sets: Vec<String>,
    /// Publication years in numeric order
    pub years: Vec<String>,
}

impl FilterOptions {
    pub fn from_cards(cards: &[Card]) -> Self {
        let mut rarities = BTreeSet::new();
        let mut features = BTreeSet::new();
        let mut types = BTreeSet::new();
        let mut sets = BTreeSet::new();
        let mut years = Vec::new();

        for card in cards {
            let present = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
            rarities.extend(present(&card.rarity));
            features.extend(present(&card.feature));
            types.extend(present(&card.card_type));
            sets.extend(card.set_code());
            if let Some(year) = card.publication_year.as_ref().filter(|y| y.is_shown()) {
                let text = year.to_string();
                if !years.iter().any(|(_, seen): &(Option<f64>, String)| *seen == text) {
                    years.push((year.as_f64(), text));
                }
            }
        }

        years.sort_by(|(a, a_text), (b, b_text)| match (a, b) {
            (Some(a), Some(b)) => a.total_cmp(b),
            _ => a_text.cmp(b_text),
        });

        Self {
            rarities: rarities.into_iter().collect(),
            features: features.into_iter().collect(),
            types: types.into_iter().collect(),
            sets: sets.into_iter().collect(),
            years: years.into_iter().map(|(_, text)| text).collect(),
        }
    }
}

pub fn format_filter_options(options: &FilterOptions) -> String {
    let groups = [
        ("Rarity", &options.rarities),
        ("Feature", &options.features),
        ("Type", &options.types),
        ("Set", &options.sets),
        ("Year", &options.years),
    ];
    let mut output = String::new();
    for (label, values) in groups {
        if !values.is_empty() {
            output.push_str(&format!("{label}: {}\n", values.join(", ")));
        }
    }
    output
}
