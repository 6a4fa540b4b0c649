//! End-to-end behaviour of the drop-in module against the mock native drop-in.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedReceiver;

use dropin_bridge::{
    BridgeConfig, ChannelEmitter, DID_FAIL, DID_PROVIDE, DID_SUBMIT, DropInModule, HostEvent,
    PaymentPackage,
};
use dropin_core::native::{MockDropIn, SessionOutcome};
use dropin_core::value::json_to_map;
use dropin_core::{DeliveryPolicy, HostMap, HostValue, NativeError, SessionCallbacks};

struct Harness {
    package: PaymentPackage,
    dropin: Arc<MockDropIn>,
    module: Arc<DropInModule>,
    events: UnboundedReceiver<HostEvent>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(&BridgeConfig {
            package_name: "com.shop.app".into(),
            delivery_policy: DeliveryPolicy::Drop,
        })
    }

    fn with_config(config: &BridgeConfig) -> Self {
        let package = PaymentPackage::new(config);
        let dropin = Arc::new(MockDropIn::new());
        let (emitter, events) = ChannelEmitter::new();
        let module = package.create_drop_in_module(dropin.clone(), Arc::new(emitter));
        Self {
            package,
            dropin,
            module,
            events,
        }
    }

    fn drain(&mut self) -> Vec<HostEvent> {
        std::iter::from_fn(|| self.events.try_recv().ok()).collect()
    }

    fn open_default(&self) {
        self.module.open(&payment_methods(), &host(json!({
            "environment": "test",
            "clientKey": "k1"
        })));
    }
}

fn host(value: Value) -> HostMap {
    json_to_map(&value).unwrap()
}

fn payment_methods() -> HostMap {
    host(json!({
        "paymentMethods": [
            { "type": "scheme", "name": "Credit Card", "brands": ["visa", "mc"] },
            { "type": "ideal", "name": "iDEAL" }
        ]
    }))
}

fn fail_code(event: &HostEvent) -> Option<&str> {
    match event {
        HostEvent::DidFail(error) => error.code.as_deref(),
        _ => None,
    }
}

#[test]
fn open_with_minimal_configuration_launches_without_wallet() {
    let mut harness = Harness::new();
    harness.open_default();

    assert_eq!(harness.dropin.launch_count(), 1);
    let launch = harness.dropin.last_launch().unwrap();
    assert!(launch.configuration.google_pay.is_none());
    assert!(!launch.configuration.bcmc.show_store_payment_field);
    assert_eq!(launch.payment_methods.payment_methods.len(), 2);

    assert!(harness.package.registry().active_session().is_some());
    assert!(harness.drain().is_empty());
}

#[test]
fn open_without_required_root_field_fails_once_and_never_launches() {
    for configuration in [
        json!({ "clientKey": "k1" }),
        json!({ "environment": "test" }),
        json!({}),
    ] {
        let mut harness = Harness::new();
        harness.module.open(&payment_methods(), &host(configuration));

        let events = harness.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), DID_FAIL);
        assert_eq!(fail_code(&events[0]), Some("FIELD_NOT_FOUND"));
        assert_eq!(harness.dropin.launch_count(), 0);
    }
}

#[test]
fn open_with_malformed_payment_methods_fails_before_parsing_configuration() {
    let mut harness = Harness::new();
    harness.module.open(
        &host(json!({ "paymentMethods": { "type": "scheme" } })),
        &host(json!({ "environment": "test", "clientKey": "k1" })),
    );

    let events = harness.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(fail_code(&events[0]), Some("INVALID_PAYMENT_METHODS"));
    assert_eq!(harness.dropin.launch_count(), 0);
}

#[test]
fn open_with_amount_but_no_country_code_still_launches() {
    let mut harness = Harness::new();
    harness.module.open(&payment_methods(), &host(json!({
        "environment": "test",
        "clientKey": "k1",
        "amount": { "value": 1000, "currency": "USD" }
    })));

    assert!(harness.drain().is_empty());
    let launch = harness.dropin.last_launch().unwrap();
    assert_eq!(launch.configuration.amount.unwrap().value, 1000);
    assert!(launch.configuration.google_pay.is_none());
}

#[test]
fn open_with_amount_and_country_code_configures_wallet() {
    let harness = Harness::new();
    harness.module.open(&payment_methods(), &host(json!({
        "environment": "test",
        "clientKey": "k1",
        "countryCode": "NL",
        "amount": { "value": 1000, "currency": "EUR" }
    })));

    let google_pay = harness.dropin.last_launch().unwrap().configuration.google_pay;
    assert_eq!(google_pay.unwrap().country_code, "NL");
}

#[test]
fn launch_failure_is_reported() {
    let package = PaymentPackage::new(&BridgeConfig::default());
    let (emitter, mut events) = ChannelEmitter::new();
    let module = package.create_drop_in_module(Arc::new(MockDropIn::refusing()), Arc::new(emitter));

    module.open(&payment_methods(), &host(json!({ "environment": "test", "clientKey": "k1" })));

    assert_eq!(fail_code(&events.try_recv().unwrap()), Some("LAUNCH_FAILED"));
    assert!(package.registry().current_action_sink().is_none());
}

#[test]
fn submission_is_converted_and_carries_return_url() {
    let mut harness = Harness::new();
    harness.open_default();

    harness.dropin.callbacks().unwrap().on_submit(json!({
        "paymentMethod": { "type": "scheme", "encryptedCardNumber": "abc" },
        "storePaymentMethod": true
    }));

    let events = harness.drain();
    assert_eq!(events.len(), 1);
    let HostEvent::DidSubmit(payload) = &events[0] else {
        panic!("expected submission, got {:?}", events[0]);
    };
    assert_eq!(payload.get_string("returnUrl"), Some("adyencheckout://com.shop.app"));
    assert_eq!(payload.get_bool("storePaymentMethod"), Some(true));
    assert_eq!(
        payload.get_map("paymentMethod").and_then(|m| m.get_string("type")),
        Some("scheme")
    );
}

#[test]
fn non_object_submission_emits_failure_instead() {
    let mut harness = Harness::new();
    harness.open_default();

    harness.dropin.callbacks().unwrap().on_submit(json!(["not", "an", "object"]));

    let events = harness.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(fail_code(&events[0]), Some("CONVERSION_FAILED"));
}

#[test]
fn provided_details_are_forwarded() {
    let mut harness = Harness::new();
    harness.open_default();

    harness
        .dropin
        .callbacks()
        .unwrap()
        .on_provide(json!({ "details": { "redirectResult": "X6XtfGC3" } }));

    let events = harness.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), DID_PROVIDE);
}

#[test]
fn native_failure_is_mapped_and_ends_session() {
    let mut harness = Harness::new();
    harness.open_default();

    harness
        .dropin
        .callbacks()
        .unwrap()
        .on_fail(NativeError::new("Cancelled by shopper").with_code("canceledByShopper"));

    let events = harness.drain();
    let HostEvent::DidFail(error) = &events[0] else {
        panic!("expected failure");
    };
    assert_eq!(error.error_message, "Cancelled by shopper");
    assert_eq!(error.code.as_deref(), Some("canceledByShopper"));
    assert!(harness.package.registry().current_action_sink().is_none());
}

#[test]
fn handle_forwards_action_to_live_session() {
    let mut harness = Harness::new();
    harness.open_default();

    harness.module.handle(&host(json!({
        "type": "redirect",
        "url": "https://checkoutshopper-test.adyen.com/redirect",
        "method": "GET",
        "paymentData": "Ab02b4c0"
    })));

    assert!(harness.drain().is_empty());
    let actions = harness.dropin.last_session().unwrap().actions();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0]["type"], "redirect");
    assert_eq!(actions[0]["paymentData"], "Ab02b4c0");
}

#[test]
fn handle_and_hide_without_session_fail_with_invalid_state() {
    let mut harness = Harness::new();

    harness.module.handle(&host(json!({ "type": "redirect" })));
    harness.module.hide(true, None);

    let events = harness.drain();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| fail_code(e) == Some("INVALID_STATE")));
    assert_eq!(harness.dropin.launch_count(), 0);
}

#[test]
fn handle_with_unconvertible_action_fails() {
    let mut harness = Harness::new();
    harness.open_default();

    let mut action = HostMap::new();
    action.insert("type", "threeDS2");
    action.insert("weight", HostValue::Double(f64::INFINITY));
    harness.module.handle(&action);

    let events = harness.drain();
    assert_eq!(fail_code(&events[0]), Some("CONVERSION_FAILED"));
    assert!(harness.dropin.last_session().unwrap().actions().is_empty());
}

#[test]
fn hide_completes_or_fails_and_clears_session() {
    let mut harness = Harness::new();
    harness.open_default();
    harness
        .module
        .hide(true, Some(&host(json!({ "message": "Authorised" }))));

    assert_eq!(
        harness.dropin.last_session().unwrap().outcome(),
        Some(SessionOutcome::Completed(Some(json!({ "message": "Authorised" }))))
    );
    assert!(harness.package.registry().active_session().is_none());

    harness.open_default();
    harness.module.hide(false, None);
    assert_eq!(
        harness.dropin.last_session().unwrap().outcome(),
        Some(SessionOutcome::Failed(None))
    );

    // Session is gone; a second hide is a state error
    harness.module.hide(false, None);
    let events = harness.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(fail_code(&events[0]), Some("INVALID_STATE"));
}

#[test]
fn failure_during_launch_leaves_no_live_session() {
    let package = PaymentPackage::new(&BridgeConfig::default());
    let (emitter, mut events) = ChannelEmitter::new();
    let dropin = Arc::new(MockDropIn::aborting());
    let module = package.create_drop_in_module(dropin.clone(), Arc::new(emitter));

    module.open(&payment_methods(), &host(json!({ "environment": "test", "clientKey": "k1" })));

    assert_eq!(fail_code(&events.try_recv().unwrap()), Some("launchAborted"));
    assert!(package.registry().current_action_sink().is_none());
    assert!(package.registry().active_session().is_none());

    // The flow is gone, so commands report a state error instead of reaching it
    module.handle(&host(json!({ "type": "redirect" })));
    module.hide(true, None);
    let codes: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|e| fail_code(&e).map(str::to_string))
        .collect();
    assert_eq!(codes, vec![Some("INVALID_STATE".to_string()); 2]);

    let session = dropin.last_session().unwrap();
    assert!(session.actions().is_empty());
    assert_eq!(session.outcome(), None);
}

#[test]
fn late_failure_of_previous_flow_does_not_end_current_one() {
    let mut harness = Harness::new();
    harness.open_default();
    let previous = harness.dropin.callbacks().unwrap();
    harness.module.hide(true, None);

    harness.open_default();
    let current = harness.package.registry().active_session().unwrap();

    previous.on_fail(NativeError::new("Timed out").with_code("timeout"));
    previous.on_provide(json!({ "details": {} }));

    assert!(harness.drain().is_empty());
    assert_eq!(harness.package.registry().active_session(), Some(current));

    harness.module.handle(&host(json!({ "type": "redirect" })));
    assert_eq!(harness.dropin.last_session().unwrap().actions().len(), 1);
}

#[test]
fn commands_without_session_leave_event_sink_alone() {
    let mut harness = Harness::new();
    let (emitter, mut other_events) = ChannelEmitter::new();
    let other = harness
        .package
        .create_drop_in_module(harness.dropin.clone(), Arc::new(emitter));

    // A flow that has started but not yet handed back its session
    let callbacks = SessionCallbacks::new(harness.package.registry().clone());

    harness.module.handle(&host(json!({ "type": "redirect" })));
    harness.module.hide(false, None);

    let events = harness.drain();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| fail_code(e) == Some("INVALID_STATE")));

    callbacks.on_provide(json!({ "details": {} }));
    assert_eq!(other_events.try_recv().unwrap().name(), DID_PROVIDE);
    assert!(harness.drain().is_empty());
    drop(other);
}

#[test]
fn recreated_module_receives_events_of_running_session() {
    let mut harness = Harness::new();
    harness.open_default();
    let callbacks = harness.dropin.callbacks().unwrap();

    // Host runtime replaces the module while the native flow keeps running
    let (emitter, mut new_events) = ChannelEmitter::new();
    let replacement = harness
        .package
        .create_drop_in_module(harness.dropin.clone(), Arc::new(emitter));

    callbacks.on_provide(json!({ "details": {} }));

    assert!(harness.drain().is_empty());
    assert_eq!(new_events.try_recv().unwrap().name(), DID_PROVIDE);

    // Commands from the replacement still reach the original session
    replacement.handle(&host(json!({ "type": "await" })));
    assert_eq!(harness.dropin.last_session().unwrap().actions().len(), 1);
}

#[test]
fn replay_policy_delivers_events_missed_while_no_module_was_alive() {
    let config = BridgeConfig {
        package_name: "com.shop.app".into(),
        delivery_policy: DeliveryPolicy::Replay { capacity: 4 },
    };
    let harness = Harness::with_config(&config);
    harness.open_default();
    let callbacks = harness.dropin.callbacks().unwrap();
    let Harness {
        package,
        dropin,
        module,
        events,
    } = harness;

    drop(module);
    drop(events);
    callbacks.on_submit(json!({ "paymentMethod": { "type": "ideal" } }));
    assert_eq!(package.registry().pending_len(), 1);

    let (emitter, mut replayed) = ChannelEmitter::new();
    let _module = package.create_drop_in_module(dropin, Arc::new(emitter));

    let event = replayed.try_recv().unwrap();
    assert_eq!(event.name(), DID_SUBMIT);
    assert_eq!(package.registry().pending_len(), 0);
}

#[tokio::test]
async fn interactive_mock_drives_a_full_flow() {
    let package = PaymentPackage::new(&BridgeConfig::default());
    let (emitter, mut events) = ChannelEmitter::new();
    let dropin = Arc::new(MockDropIn::interactive());
    let module = package.create_drop_in_module(dropin.clone(), Arc::new(emitter));

    module.open(&payment_methods(), &host(json!({ "environment": "test", "clientKey": "k1" })));
    let submitted = events.recv().await.unwrap();
    assert_eq!(submitted.name(), DID_SUBMIT);

    module.handle(&host(json!({ "type": "redirect", "paymentData": "pd" })));
    let HostEvent::DidProvide(details) = events.recv().await.unwrap() else {
        panic!("expected details");
    };
    assert_eq!(details.get_string("paymentData"), Some("pd"));

    module.hide(true, None);
    assert_eq!(
        dropin.last_session().unwrap().outcome(),
        Some(SessionOutcome::Completed(None))
    );
}
