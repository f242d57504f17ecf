//! Persisted-entity interface consumed by the engine, plus an in-memory implementation.
//!
//! The engine never talks to a database directly. It reads and writes tournaments,
//! competitors, boards and matches through [`TournamentStore`]. Every engine operation
//! takes `&mut S`, so whoever owns the store (a lock, a transaction) decides the
//! mutual-exclusion scope.

use crate::models::{
    Board, BoardId, Competitor, CompetitorId, GameMatch, MatchId, Tournament, TournamentError,
    TournamentId,
};
use std::collections::HashMap;

pub trait TournamentStore {
    fn tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError>;

    /// Insert a new tournament; the store assigns its id.
    fn create_tournament(&mut self, tournament: Tournament) -> Result<Tournament, TournamentError>;

    /// Overwrite configuration/status of an existing tournament.
    fn save_tournament(&mut self, tournament: &Tournament) -> Result<(), TournamentError>;

    fn competitor(&self, id: CompetitorId) -> Result<Competitor, TournamentError>;

    fn add_competitor(&mut self, name: &str) -> Competitor;

    fn board(&self, id: BoardId) -> Result<Board, TournamentError>;

    fn add_board(&mut self, name: &str, number: u32) -> Board;

    /// All matches of a tournament, in creation order.
    fn matches(&self, tournament_id: TournamentId) -> Result<Vec<GameMatch>, TournamentError>;

    fn get_match(&self, id: MatchId) -> Result<GameMatch, TournamentError>;

    /// Persist new matches in the given order and return them with ids assigned.
    ///
    /// Must reject knockout matches for a (tournament, round) that already has knockout
    /// matches with [`TournamentError::RoundAlreadyExists`], leaving nothing inserted.
    fn insert_matches(
        &mut self,
        matches: Vec<GameMatch>,
    ) -> Result<Vec<GameMatch>, TournamentError>;

    fn update_match(&mut self, m: &GameMatch) -> Result<(), TournamentError>;

    /// Competitors of a tournament, in roster order.
    fn roster(&self, tournament_id: TournamentId) -> Result<Vec<Competitor>, TournamentError> {
        self.tournament(tournament_id)?
            .competitors
            .iter()
            .map(|&id| self.competitor(id))
            .collect()
    }

    /// Boards of a tournament, in link order.
    fn boards(&self, tournament_id: TournamentId) -> Result<Vec<Board>, TournamentError> {
        self.tournament(tournament_id)?
            .boards
            .iter()
            .map(|&id| self.board(id))
            .collect()
    }
}

/// In-memory store. Match ids increase monotonically, so id order mirrors creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tournaments: HashMap<TournamentId, Tournament>,
    competitors: HashMap<CompetitorId, Competitor>,
    boards: HashMap<BoardId, Board>,
    matches: Vec<GameMatch>,
    next_tournament_id: TournamentId,
    next_competitor_id: CompetitorId,
    next_board_id: BoardId,
    next_match_id: MatchId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All tournaments, ordered by id.
    pub fn tournaments(&self) -> Vec<&Tournament> {
        let mut all: Vec<_> = self.tournaments.values().collect();
        all.sort_by_key(|t| t.id);
        all
    }
}

impl TournamentStore for MemoryStore {
    fn tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.tournaments
            .get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    fn create_tournament(
        &mut self,
        mut tournament: Tournament,
    ) -> Result<Tournament, TournamentError> {
        self.next_tournament_id += 1;
        tournament.id = self.next_tournament_id;
        self.tournaments.insert(tournament.id, tournament.clone());
        Ok(tournament)
    }

    fn save_tournament(&mut self, tournament: &Tournament) -> Result<(), TournamentError> {
        let slot = self
            .tournaments
            .get_mut(&tournament.id)
            .ok_or(TournamentError::TournamentNotFound(tournament.id))?;
        *slot = tournament.clone();
        Ok(())
    }

    fn competitor(&self, id: CompetitorId) -> Result<Competitor, TournamentError> {
        self.competitors
            .get(&id)
            .cloned()
            .ok_or(TournamentError::UnknownCompetitor(id))
    }

    fn add_competitor(&mut self, name: &str) -> Competitor {
        self.next_competitor_id += 1;
        let c = Competitor::new(self.next_competitor_id, name.trim());
        self.competitors.insert(c.id, c.clone());
        c
    }

    fn board(&self, id: BoardId) -> Result<Board, TournamentError> {
        self.boards
            .get(&id)
            .cloned()
            .ok_or(TournamentError::UnknownBoard(id))
    }

    fn add_board(&mut self, name: &str, number: u32) -> Board {
        self.next_board_id += 1;
        let b = Board::new(self.next_board_id, name.trim(), number);
        self.boards.insert(b.id, b.clone());
        b
    }

    fn matches(&self, tournament_id: TournamentId) -> Result<Vec<GameMatch>, TournamentError> {
        if !self.tournaments.contains_key(&tournament_id) {
            return Err(TournamentError::TournamentNotFound(tournament_id));
        }
        Ok(self
            .matches
            .iter()
            .filter(|m| m.tournament_id == tournament_id)
            .cloned()
            .collect())
    }

    fn get_match(&self, id: MatchId) -> Result<GameMatch, TournamentError> {
        self.matches
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(TournamentError::MatchNotFound(id))
    }

    fn insert_matches(
        &mut self,
        matches: Vec<GameMatch>,
    ) -> Result<Vec<GameMatch>, TournamentError> {
        // Uniqueness constraint on (tournament, knockout round), checked before any write.
        for m in matches.iter().filter(|m| m.is_knockout()) {
            let taken = self.matches.iter().any(|existing| {
                existing.is_knockout()
                    && existing.tournament_id == m.tournament_id
                    && existing.round == m.round
            });
            if taken {
                return Err(TournamentError::RoundAlreadyExists { round: m.round });
            }
        }

        let mut inserted = Vec::with_capacity(matches.len());
        for mut m in matches {
            self.next_match_id += 1;
            m.id = self.next_match_id;
            self.matches.push(m.clone());
            inserted.push(m);
        }
        Ok(inserted)
    }

    fn update_match(&mut self, m: &GameMatch) -> Result<(), TournamentError> {
        let slot = self
            .matches
            .iter_mut()
            .find(|existing| existing.id == m.id)
            .ok_or(TournamentError::MatchNotFound(m.id))?;
        *slot = m.clone();
        Ok(())
    }
}
