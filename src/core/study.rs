//! Study session: which cards to show, in what order, and the tally of ratings.

use std::time::{Duration, Instant};

use log::debug;

use super::deck::{Deck, Difficulty, FlashCard};

/// Outcome of a study session, handed to the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StudySummary {
    pub deck: String,
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
    /// False when the session ended early (Escape or time limit).
    pub complete: bool,
}

impl StudySummary {
    pub fn total(&self) -> u32 {
        self.easy + self.medium + self.hard
    }
}

#[derive(Debug, Clone)]
pub struct StudySession {
    deck: Deck,
    /// Indices into `deck.cards`, in study order.
    order: Vec<usize>,
    position: usize,
    revealed: bool,
    summary: StudySummary,
}

impl StudySession {
    /// Hardest cards first (High > Medium > Unknown > Low), then the least
    /// answered, then deck order. At most `card_limit` cards are studied.
    pub fn new(deck: Deck, card_limit: u32) -> Self {
        let mut order: Vec<usize> = (0..deck.cards.len()).collect();
        order.sort_by_key(|&i| {
            let card = &deck.cards[i];
            (std::cmp::Reverse(card.difficulty.priority()), card.times_answered, i)
        });
        order.truncate(card_limit as usize);
        debug!("Study order for '{}': {:?}", deck.name, order);

        let summary = StudySummary {
            deck: deck.name.clone(),
            ..Default::default()
        };
        Self {
            deck,
            order,
            position: 0,
            revealed: false,
            summary,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn current(&self) -> Option<&FlashCard> {
        self.order.get(self.position).map(|&i| &self.deck.cards[i])
    }

    /// (1-based position of the current card, cards in session)
    pub fn progress(&self) -> (usize, usize) {
        ((self.position + 1).min(self.order.len()), self.order.len())
    }

    pub fn reveal(&mut self) {
        if self.current().is_some() {
            self.revealed = true;
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Record a rating for the current card and move to the next one.
    /// Ignored once the session is finished.
    pub fn rate(&mut self, difficulty: Difficulty) {
        let Some(&index) = self.order.get(self.position) else {
            return;
        };
        let card = &mut self.deck.cards[index];
        card.difficulty = difficulty;
        card.times_answered = card.times_answered.saturating_add(1);

        match difficulty {
            Difficulty::Low => self.summary.easy += 1,
            Difficulty::Medium => self.summary.medium += 1,
            Difficulty::High => self.summary.hard += 1,
            Difficulty::Unknown => {}
        }

        self.position += 1;
        self.revealed = false;
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.order.len()
    }

    pub fn expired(&self, started: Instant, now: Instant, limit: Duration) -> bool {
        now.saturating_duration_since(started) >= limit
    }

    pub fn summary(&self) -> StudySummary {
        StudySummary {
            complete: self.is_finished(),
            ..self.summary.clone()
        }
    }

    /// Consume the session, returning the deck with updated ratings.
    pub fn into_deck(self) -> Deck {
        self.deck
    }
}
