// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hands recording session.
use anyhow::{Result, bail};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

use hitstand_cards::{Card, Hand, Total};

use crate::{
    advice::{AdviceRequest, GameRules},
    cache::{AdviceCache, HandKey},
    client::{AdviceApi, HttpClient},
    error::AdviceError,
    store::Store,
    throttle::Throttle,
};

/// The player and dealer hands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hands {
    /// The player hand.
    #[serde(default)]
    pub player: Hand,
    /// The dealer hand.
    #[serde(default)]
    pub dealer: Hand,
}

impl Hands {
    /// Gets a hand.
    pub fn get(&self, kind: HandKind) -> &Hand {
        match kind {
            HandKind::Player => &self.player,
            HandKind::Dealer => &self.dealer,
        }
    }

    fn get_mut(&mut self, kind: HandKind) -> &mut Hand {
        match kind {
            HandKind::Player => &mut self.player,
            HandKind::Dealer => &mut self.dealer,
        }
    }
}

/// Selects one of the two hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandKind {
    /// The player hand.
    Player,
    /// The dealer hand.
    Dealer,
}

impl fmt::Display for HandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandKind::Player => write!(f, "player"),
            HandKind::Dealer => write!(f, "dealer"),
        }
    }
}

/// How a picked card is added to a hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryMode {
    /// Append the card.
    #[default]
    Add,
    /// Replace the last card, or append if the hand is empty.
    Replace,
}

impl EntryMode {
    /// The mode label.
    pub fn label(&self) -> &'static str {
        match self {
            EntryMode::Add => "ADD",
            EntryMode::Replace => "REPLACE",
        }
    }
}

/// The state of a hands recording session.
///
/// A session is created when the front-end opens, loads the hands from the
/// store, and writes them back on every change. The advice cache and the
/// throttle live only as long as the session.
#[derive(Debug)]
pub struct Session {
    hands: Hands,
    selected: Option<HandKind>,
    mode: EntryMode,
    rules: GameRules,
    cache: AdviceCache,
    throttle: Throttle,
    store: Store,
}

impl Session {
    /// Opens a session loading the hands from the store.
    pub fn open(store: Store, request_delay: Duration) -> Self {
        let hands = store.hands().clone();
        info!(
            "Loaded hands player: [{}] dealer: [{}]",
            hands.player, hands.dealer
        );

        Self {
            hands,
            selected: None,
            mode: EntryMode::default(),
            rules: GameRules::default(),
            cache: AdviceCache::default(),
            throttle: Throttle::new(request_delay),
            store,
        }
    }

    /// The current hands.
    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    /// The total of a hand.
    pub fn total(&self, kind: HandKind) -> Total {
        self.hands.get(kind).total()
    }

    /// The advice cache.
    pub fn cache(&self) -> &AdviceCache {
        &self.cache
    }

    /// The current entry mode.
    pub fn mode(&self) -> EntryMode {
        self.mode
    }

    /// Sets the entry mode.
    pub fn set_mode(&mut self, mode: EntryMode) {
        debug!("Mode changed to {}", mode.label());
        self.mode = mode;
    }

    /// Switches between add and replace modes.
    pub fn toggle_mode(&mut self) {
        let mode = match self.mode {
            EntryMode::Add => EntryMode::Replace,
            EntryMode::Replace => EntryMode::Add,
        };
        self.set_mode(mode);
    }

    /// The hand that receives the next picked card.
    pub fn selected(&self) -> Option<HandKind> {
        self.selected
    }

    /// Selects the hand for the next picked card.
    pub fn select_hand(&mut self, kind: HandKind) {
        self.selected = Some(kind);
    }

    /// Drops the hand selection without picking a card.
    pub fn cancel_selection(&mut self) {
        self.selected = None;
    }

    /// Adds a card to the selected hand according to the entry mode.
    ///
    /// The selection is cleared and the hands are persisted, returns the hand
    /// that got the card.
    pub fn pick(&mut self, card: Card) -> Result<HandKind> {
        let Some(kind) = self.selected.take() else {
            bail!("No hand selected");
        };

        // Hands in memory only change once they are on disk.
        let mut hands = self.hands.clone();
        let hand = hands.get_mut(kind);
        match self.mode {
            EntryMode::Replace if !hand.is_empty() => {
                hand.replace_last(card);
            }
            _ => hand.push(card),
        }

        debug!("Picked {card} for {kind} hand [{hand}]");

        self.store.save_hands(&hands)?;
        self.hands = hands;
        Ok(kind)
    }

    /// Empties both hands and the advice cache.
    ///
    /// Nothing changes if the empty hands cannot be persisted.
    pub fn clear(&mut self) -> Result<()> {
        info!("Clearing hands");

        self.store.save_hands(&Hands::default())?;
        self.hands = Hands::default();
        self.selected = None;
        self.cache.clear();
        Ok(())
    }

    /// The API token if one has been fetched.
    pub fn token(&self) -> Option<&str> {
        self.store.token()
    }

    /// Fetches and persists a new API token.
    pub async fn refresh_token(&mut self, client: &HttpClient) -> Result<()> {
        let token = client.fetch_token().await?;
        self.store.save_token(token)?;
        info!("Token saved to {}", self.store.path().display());
        Ok(())
    }

    /// Fetches a token if none has been persisted yet.
    ///
    /// Errors are logged and leave the token unset.
    pub async fn ensure_token(&mut self, client: &HttpClient) {
        if self.token().is_none() {
            if let Err(e) = self.refresh_token(client).await {
                error!("Error fetching token: {e}");
            }
        }
    }

    /// Requests advice for the current hands.
    ///
    /// Requests are rejected while the throttle delay since the last
    /// successful consult has not elapsed. Advice for a hands composition
    /// seen before is returned from the cache.
    pub async fn consult<A: AdviceApi>(&mut self, api: &A) -> Result<String, AdviceError> {
        self.throttle
            .check()
            .map_err(|remaining| AdviceError::Throttled { remaining })?;

        if self.hands.player.len() < 2 {
            return Err(AdviceError::NotEnoughPlayerCards);
        }

        if self.hands.dealer.is_empty() {
            return Err(AdviceError::NoDealerCard);
        }

        let key = HandKey::new(&self.hands.player, &self.hands.dealer);
        let advice = if let Some(advice) = self.cache.get(&key) {
            debug!("Cached advice {advice} for {key:?}");
            advice.to_string()
        } else {
            let req = AdviceRequest {
                player: key.player().to_vec(),
                dealer: key.dealer().to_vec(),
                game_rules: self.rules,
            };

            let advice = api.advice(&req, self.store.token()).await?;
            info!("Advice {advice} for {key:?}");
            self.cache.insert(key, advice.clone());
            advice
        };

        self.throttle.complete();
        Ok(advice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::tests::{serve_counted, serve_once},
        throttle::REQUEST_DELAY,
    };
    use hitstand_cards::{Suit, Value};
    use std::{cell::RefCell, sync::atomic::Ordering};
    use tempfile::TempDir;
    use tokio::time;

    /// An advice service that records the requests it gets.
    struct FakeApi {
        reply: Result<&'static str, u16>,
        requests: RefCell<Vec<(AdviceRequest, Option<String>)>>,
    }

    impl FakeApi {
        fn new(advice: &'static str) -> Self {
            Self {
                reply: Ok(advice),
                requests: RefCell::default(),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                requests: RefCell::default(),
            }
        }

        fn calls(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl AdviceApi for FakeApi {
        async fn advice(
            &self,
            req: &AdviceRequest,
            token: Option<&str>,
        ) -> Result<String, AdviceError> {
            self.requests
                .borrow_mut()
                .push((req.clone(), token.map(str::to_string)));
            match self.reply {
                Ok(advice) => Ok(advice.to_string()),
                Err(status) => Err(AdviceError::Http { status }),
            }
        }
    }

    struct TestSession {
        session: Session,
        dir: TempDir,
    }

    impl TestSession {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let store = Store::open(dir.path()).unwrap();
            Self {
                session: Session::open(store, REQUEST_DELAY),
                dir,
            }
        }

        fn add(&mut self, kind: HandKind, cards: &str) {
            for card in cards.split_whitespace() {
                self.session.select_hand(kind);
                self.session.pick(card.parse().unwrap()).unwrap();
            }
        }

        fn reopen(&self) -> Session {
            Session::open(Store::open(self.dir.path()).unwrap(), REQUEST_DELAY)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn consult_validation() {
        let mut ts = TestSession::new();
        let api = FakeApi::new("Hit");

        let res = ts.session.consult(&api).await;
        assert!(matches!(res, Err(AdviceError::NotEnoughPlayerCards)));

        ts.add(HandKind::Player, "AH");
        ts.add(HandKind::Dealer, "9C");
        let res = ts.session.consult(&api).await;
        assert!(matches!(res, Err(AdviceError::NotEnoughPlayerCards)));

        let mut ts = TestSession::new();
        ts.add(HandKind::Player, "AH 6D");
        let res = ts.session.consult(&api).await;
        assert!(matches!(res, Err(AdviceError::NoDealerCard)));

        assert_eq!(api.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn consult_sends_values_rules_and_token() {
        let mut ts = TestSession::new();
        ts.session.store.save_token("secret".to_string()).unwrap();
        ts.add(HandKind::Player, "AH 6D");
        ts.add(HandKind::Dealer, "10C");

        let api = FakeApi::new("Hit");
        assert_eq!(ts.session.consult(&api).await.unwrap(), "Hit");

        let requests = api.requests.borrow();
        let (req, token) = &requests[0];
        assert_eq!(req.player, [Value::Ace, Value::Six]);
        assert_eq!(req.dealer, [Value::Ten]);
        assert_eq!(req.game_rules, GameRules::default());
        assert_eq!(token.as_deref(), Some("secret"));
    }

    #[tokio::test(start_paused = true)]
    async fn consult_uses_cache() {
        let mut ts = TestSession::new();
        ts.add(HandKind::Player, "8H 8D");
        ts.add(HandKind::Dealer, "6C");

        let api = FakeApi::new("Split");
        assert_eq!(ts.session.consult(&api).await.unwrap(), "Split");

        time::advance(REQUEST_DELAY).await;

        // Same values with a different suit hit the cache.
        ts.session.set_mode(EntryMode::Replace);
        ts.add(HandKind::Player, "8C");
        assert_eq!(ts.session.consult(&api).await.unwrap(), "Split");
        assert_eq!(api.calls(), 1);
        assert_eq!(ts.session.cache().len(), 1);

        time::advance(REQUEST_DELAY).await;

        // After a clear the same hands go to the server again.
        ts.session.clear().unwrap();
        assert!(ts.session.cache().is_empty());
        ts.session.set_mode(EntryMode::Add);
        ts.add(HandKind::Player, "8S 8C");
        ts.add(HandKind::Dealer, "6H");
        assert_eq!(ts.session.consult(&api).await.unwrap(), "Split");
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn throttle_checked_before_card_counts() {
        let mut ts = TestSession::new();
        ts.add(HandKind::Player, "5H 6D");
        ts.add(HandKind::Dealer, "2C");

        let api = FakeApi::new("Double");
        ts.session.consult(&api).await.unwrap();

        // Empty hands inside the throttle window report the throttle.
        ts.session.clear().unwrap();
        time::advance(Duration::from_millis(500)).await;
        match ts.session.consult(&api).await {
            Err(AdviceError::Throttled { remaining }) => {
                assert_eq!(remaining, Duration::from_millis(2500));
            }
            res => panic!("Unexpected result {res:?}"),
        }

        time::advance(Duration::from_millis(2500)).await;
        assert!(matches!(
            ts.session.consult(&api).await,
            Err(AdviceError::NotEnoughPlayerCards)
        ));
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn consult_throttle() {
        let mut ts = TestSession::new();
        ts.add(HandKind::Player, "10H 6D");
        ts.add(HandKind::Dealer, "10C");

        let api = FakeApi::new("Surrender");
        ts.session.consult(&api).await.unwrap();

        time::advance(Duration::from_millis(1000)).await;

        let res = ts.session.consult(&api).await;
        match res {
            Err(AdviceError::Throttled { remaining }) => {
                assert_eq!(remaining, Duration::from_millis(2000));
            }
            res => panic!("Unexpected result {res:?}"),
        }

        // A cache hit also restarts the throttle.
        time::advance(Duration::from_millis(2000)).await;
        ts.session.consult(&api).await.unwrap();
        assert!(matches!(
            ts.session.consult(&api).await,
            Err(AdviceError::Throttled { .. })
        ));

        assert_eq!(api.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_consult_does_not_throttle() {
        let mut ts = TestSession::new();
        ts.add(HandKind::Player, "10H 2D");
        ts.add(HandKind::Dealer, "4C");

        let api = FakeApi::failing(500);
        for _ in 0..2 {
            let res = ts.session.consult(&api).await;
            assert!(matches!(res, Err(AdviceError::Http { status: 500 })));
        }

        assert_eq!(api.calls(), 2);
        assert!(ts.session.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_hands_and_cache() {
        let mut ts = TestSession::new();
        ts.add(HandKind::Player, "AH 7D");
        ts.add(HandKind::Dealer, "9C");

        let api = FakeApi::new("Hit");
        ts.session.consult(&api).await.unwrap();
        assert_eq!(ts.session.cache().len(), 1);

        ts.session.select_hand(HandKind::Player);
        ts.session.clear().unwrap();
        assert!(ts.session.hands().player.is_empty());
        assert!(ts.session.hands().dealer.is_empty());
        assert!(ts.session.cache().is_empty());
        assert!(ts.session.selected().is_none());

        let session = ts.reopen();
        assert_eq!(session.hands(), &Hands::default());
    }

    #[test]
    fn pick_modes() {
        let mut ts = TestSession::new();

        // No hand selected.
        let card = Card::new(Value::Ace, Suit::Hearts);
        assert!(ts.session.pick(card).is_err());

        // Replace on an empty hand appends.
        ts.session.set_mode(EntryMode::Replace);
        ts.add(HandKind::Dealer, "5S");
        assert_eq!(ts.session.hands().dealer.values(), [Value::Five]);

        ts.add(HandKind::Dealer, "KH");
        assert_eq!(ts.session.hands().dealer.values(), [Value::King]);

        ts.session.toggle_mode();
        assert_eq!(ts.session.mode(), EntryMode::Add);
        ts.add(HandKind::Player, "AH 6D");
        assert_eq!(ts.session.total(HandKind::Player).to_string(), "soft 17");

        ts.session.toggle_mode();
        ts.add(HandKind::Player, "10C");
        assert_eq!(ts.session.hands().player.values(), [Value::Ace, Value::Ten]);
        assert_eq!(ts.session.total(HandKind::Player).points, 21);
        assert!(ts.session.selected().is_none());
    }

    #[test]
    fn hands_persisted_on_pick() {
        let mut ts = TestSession::new();
        ts.add(HandKind::Player, "AH AD 9C");
        ts.add(HandKind::Dealer, "7S");

        let session = ts.reopen();
        assert_eq!(session.hands(), ts.session.hands());
        assert_eq!(session.total(HandKind::Player).points, 21);
        assert_eq!(session.total(HandKind::Dealer).points, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_save_keeps_hands() {
        let mut ts = TestSession::new();
        ts.add(HandKind::Player, "9H 7D");
        ts.add(HandKind::Dealer, "10S");

        let api = FakeApi::new("Stand");
        ts.session.consult(&api).await.unwrap();
        let hands = ts.session.hands().clone();

        // A directory in place of the store file makes every save fail.
        let path = ts.session.store.path().to_path_buf();
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        ts.session.select_hand(HandKind::Player);
        assert!(ts.session.pick(Card::new(Value::Two, Suit::Clubs)).is_err());
        assert_eq!(ts.session.hands(), &hands);

        assert!(ts.session.clear().is_err());
        assert_eq!(ts.session.hands(), &hands);
        assert_eq!(ts.session.cache().len(), 1);
    }

    #[test]
    fn cancel_selection() {
        let mut ts = TestSession::new();
        ts.session.select_hand(HandKind::Dealer);
        assert_eq!(ts.session.selected(), Some(HandKind::Dealer));

        ts.session.cancel_selection();
        assert!(ts.session.pick(Card::new(Value::Two, Suit::Clubs)).is_err());
        assert!(ts.session.hands().dealer.is_empty());
    }

    #[tokio::test]
    async fn ensure_token_fetches_once() {
        let mut ts = TestSession::new();
        let (url, served) = serve_counted("200 OK", r#"{"token":"t0k3n"}"#).await;
        let client = HttpClient::new("", url);

        ts.session.ensure_token(&client).await;
        assert_eq!(ts.session.token(), Some("t0k3n"));
        assert_eq!(served.load(Ordering::SeqCst), 1);

        ts.session.ensure_token(&client).await;
        assert_eq!(served.load(Ordering::SeqCst), 1);
        assert_eq!(ts.reopen().token(), Some("t0k3n"));
    }

    #[tokio::test]
    async fn ensure_token_failure_leaves_token_unset() {
        let mut ts = TestSession::new();
        let (url, _rx) = serve_once("500 Internal Server Error", "").await;
        let client = HttpClient::new("", url);

        ts.session.ensure_token(&client).await;
        assert!(ts.session.token().is_none());
    }
}
