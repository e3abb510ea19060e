use std::sync::{Arc, Mutex};
use std::time::Duration;

use approx::assert_relative_eq;
use hud_core::time::fixed_clock;
use hud_core::{FuelPump, OrderQuote, ParamsError, ProgressBar, ProgressComplete, PumpComplete};
use services::{
    CardSink, CommandError, HudConfig, HudRouter, HudSinks, InputCard, Notification,
    RecordingNotifier, RecordingSink,
};
use tokio::time::sleep;

#[derive(Clone, Default)]
struct Cards {
    shown: Arc<Mutex<Vec<InputCard>>>,
    quotes: Arc<Mutex<Vec<OrderQuote>>>,
    hidden: Arc<Mutex<u32>>,
}

impl CardSink for Cards {
    fn show_input(&self, card: &InputCard) {
        self.shown.lock().unwrap().push(card.clone());
    }

    fn update_quote(&self, quote: &OrderQuote) {
        self.quotes.lock().unwrap().push(*quote);
    }

    fn hide_all(&self) {
        *self.hidden.lock().unwrap() += 1;
    }
}

struct Rig {
    router: HudRouter,
    pump: RecordingSink<FuelPump>,
    progress: RecordingSink<ProgressBar>,
    cards: Cards,
    notifier: RecordingNotifier,
}

fn rig() -> Rig {
    let pump = RecordingSink::new();
    let progress = RecordingSink::new();
    let cards = Cards::default();
    let notifier = RecordingNotifier::new();
    let router = HudRouter::new(
        &HudConfig::default(),
        fixed_clock(),
        HudSinks {
            pump: Arc::new(pump.clone()),
            progress: Arc::new(progress.clone()),
            cards: Arc::new(cards.clone()),
        },
        Arc::new(notifier.clone()),
    );
    Rig {
        router,
        pump,
        progress,
        cards,
        notifier,
    }
}

#[tokio::test(start_paused = true)]
async fn start_pump_runs_to_completion() {
    let mut rig = rig();

    rig.router
        .handle_json(r#"{"action":"start-pump","targetLitres":10,"pricePerLitre":2}"#)
        .unwrap();
    sleep(Duration::from_secs(5)).await;

    assert_eq!(
        rig.notifier.sent(),
        vec![Notification::PumpComplete(PumpComplete {
            litres: 10.0,
            completed: true
        })]
    );
}

#[tokio::test(start_paused = true)]
async fn stop_pump_reports_partial_litres() {
    let mut rig = rig();
    rig.router
        .handle_json(r#"{"action":"start-pump","targetLitres":30,"pricePerLitre":2}"#)
        .unwrap();
    sleep(Duration::from_millis(1_050)).await;

    rig.router.handle_json(r#"{"action":"stop-pump"}"#).unwrap();
    rig.router.handle_json(r#"{"action":"stop-pump"}"#).unwrap();

    let sent = rig.notifier.sent_to("pump-complete");
    assert_eq!(sent.len(), 1);
    let Notification::PumpComplete(done) = &sent[0] else {
        panic!("expected pump-complete");
    };
    assert!(!done.completed);
    assert_relative_eq!(done.litres, 2.5);
}

#[tokio::test(start_paused = true)]
async fn missing_target_is_rejected() {
    let mut rig = rig();

    let err = rig
        .router
        .handle_json(r#"{"action":"start-pump","targetLitres":-4}"#)
        .unwrap_err();
    sleep(Duration::from_secs(1)).await;

    assert!(matches!(err, CommandError::MissingTarget));
    assert!(!rig.router.fueling().is_pumping());
    assert!(rig.pump.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn start_pump_falls_back_to_station_price() {
    let mut rig = rig();
    rig.router
        .handle_json(r#"{"action":"show-input","price":3,"currentFuel":20,"stationName":"Sandy"}"#)
        .unwrap();

    rig.router
        .handle_json(r#"{"action":"start-pump","targetLitres":12}"#)
        .unwrap();
    sleep(Duration::from_millis(10)).await;

    let frame = rig.pump.last_frame().unwrap();
    assert_relative_eq!(frame.price_per_litre, 3.0);
    assert_eq!(rig.router.station().name(), "Sandy");
    let shown = rig.cards.shown.lock().unwrap().clone();
    assert_eq!(shown.len(), 1);
    assert_relative_eq!(shown[0].limits.max_litres, 80.0);
    assert_relative_eq!(shown[0].limits.max_price, 240.0);
}

#[tokio::test(start_paused = true)]
async fn show_input_again_keeps_previous_values() {
    let mut rig = rig();
    rig.router
        .handle_json(r#"{"action":"show-input","price":4,"currentFuel":10,"currency":"£"}"#)
        .unwrap();

    rig.router
        .handle_json(r#"{"action":"show-input-again","currentFuel":35}"#)
        .unwrap();

    let shown = rig.cards.shown.lock().unwrap().clone();
    let card = shown.last().unwrap();
    assert_relative_eq!(card.litre_price, 4.0);
    assert_relative_eq!(card.current_fuel, 35.0);
    assert_eq!(card.currency, "£");
}

#[tokio::test(start_paused = true)]
async fn hide_is_ignored_while_pumping() {
    let mut rig = rig();
    rig.router
        .handle_json(r#"{"action":"start-pump","targetLitres":30,"pricePerLitre":2}"#)
        .unwrap();

    rig.router.handle_json(r#"{"action":"hide"}"#).unwrap();
    assert_eq!(*rig.cards.hidden.lock().unwrap(), 0);

    rig.router.handle_json(r#"{"action":"stop-pump"}"#).unwrap();
    rig.router.handle_json(r#"{"action":"hide"}"#).unwrap();
    assert_eq!(*rig.cards.hidden.lock().unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn escape_cancels_progress_then_closes() {
    let mut rig = rig();
    rig.router
        .handle_json(
            r#"{"action":"show-progress","label":"Unloading","duration":1000,"canCancel":true}"#,
        )
        .unwrap();
    sleep(Duration::from_millis(420)).await;
    assert_relative_eq!(
        rig.progress.last_frame().unwrap().percent,
        40.0,
        epsilon = 1e-9
    );

    rig.router.handle_json(r#"{"event":"escape"}"#).unwrap();
    rig.router.handle_json(r#"{"event":"escape"}"#).unwrap();

    assert_eq!(
        rig.notifier.sent(),
        vec![
            Notification::ProgressComplete(ProgressComplete { completed: false }),
            Notification::Close,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn escape_does_not_close_while_pumping() {
    let mut rig = rig();
    rig.router
        .handle_json(r#"{"action":"start-pump","targetLitres":30,"pricePerLitre":2}"#)
        .unwrap();

    rig.router.handle_json(r#"{"event":"escape"}"#).unwrap();

    assert!(rig.notifier.sent().is_empty());
    assert!(rig.router.fueling().is_pumping());
}

#[tokio::test(start_paused = true)]
async fn hide_progress_maps_to_incomplete_finish() {
    let mut rig = rig();
    rig.router
        .handle_json(r#"{"action":"show-progress","duration":2000,"canCancel":false}"#)
        .unwrap();
    sleep(Duration::from_millis(100)).await;

    rig.router.handle_json(r#"{"event":"cancel-progress"}"#).unwrap();
    assert!(rig.router.progress().is_running());

    rig.router.handle_json(r#"{"action":"hide-progress"}"#).unwrap();
    rig.router.handle_json(r#"{"action":"hide-progress"}"#).unwrap();

    assert_eq!(
        rig.notifier.sent(),
        vec![Notification::ProgressComplete(ProgressComplete {
            completed: false
        })]
    );
}

#[tokio::test(start_paused = true)]
async fn submit_order_posts_start_fueling() {
    let mut rig = rig();

    rig.router
        .handle_json(r#"{"event":"submit-order","litres":0,"price":0}"#)
        .unwrap();
    rig.router
        .handle_json(r#"{"event":"submit-order","litres":20,"price":100}"#)
        .unwrap();

    assert_eq!(
        rig.notifier.sent(),
        vec![Notification::StartFueling { litres: 20.0 }]
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_actions_are_ignored_and_garbage_rejected() {
    let mut rig = rig();

    rig.router
        .handle_json(r#"{"action":"show-statistics","stats":{"total":3}}"#)
        .unwrap();
    let err = rig.router.handle_json("not json").unwrap_err();

    assert!(matches!(err, CommandError::Decode(_)));
    assert!(rig.notifier.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn float_progress_duration_is_accepted() {
    let mut rig = rig();

    rig.router
        .handle_json(r#"{"action":"show-progress","label":"x","duration":1500.0,"canCancel":true}"#)
        .unwrap();
    sleep(Duration::from_millis(1_600)).await;

    assert_eq!(
        rig.notifier.sent(),
        vec![Notification::ProgressComplete(ProgressComplete {
            completed: true
        })]
    );
}

#[tokio::test]
async fn unusable_progress_durations_are_rejected() {
    let mut rig = rig();

    let negative = rig
        .router
        .handle_json(r#"{"action":"show-progress","duration":-5}"#);
    let missing = rig.router.handle_json(r#"{"action":"show-progress"}"#);

    assert!(matches!(
        negative,
        Err(CommandError::Params(ParamsError::DurationMillis(_)))
    ));
    assert!(matches!(
        missing,
        Err(CommandError::Params(ParamsError::ZeroDuration))
    ));
    assert!(!rig.router.progress().is_running());
}

#[tokio::test]
async fn order_field_edits_update_the_quote() {
    let mut rig = rig();
    rig.router
        .handle_json(r#"{"action":"show-input","price":2,"currentFuel":20}"#)
        .unwrap();

    rig.router
        .handle_json(r#"{"event":"litres-input","litres":90}"#)
        .unwrap();
    rig.router
        .handle_json(r#"{"event":"price-input","price":51}"#)
        .unwrap();

    let quotes = rig.cards.quotes.lock().unwrap().clone();
    assert_eq!(quotes.len(), 2);
    assert_relative_eq!(quotes[0].litres, 80.0);
    assert_relative_eq!(quotes[0].price, 160.0);
    assert_relative_eq!(quotes[0].fill_percent, 100.0);
    assert_relative_eq!(quotes[1].litres, 25.0);
    assert_relative_eq!(quotes[1].price, 51.0);
    assert_relative_eq!(quotes[1].fill_percent, 45.0);
    assert!(rig.notifier.sent().is_empty());
}
