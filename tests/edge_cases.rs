//! Edge case and boundary condition tests for the watch face

use aviator_face::{
    angle::{hour_angle, HourDial},
    hal::{MockStore, MockSurface},
    Angle, Background, CalendarTime, ConfigOutcome, DeliveryStatus, FaceError, FaceVariant,
    InboundMessage, Indicator, RejectReason, ResourceKind, SettingKey, TimeUnits, Toggle,
    WatchFace,
};

fn load(variant: FaceVariant, time: CalendarTime) -> WatchFace<MockSurface, MockStore> {
    WatchFace::load(MockSurface::new(), MockStore::new(), variant, time).unwrap()
}

// ============================================================================
// Clock Boundaries
// ============================================================================

#[test]
fn second_zero_minute_zero_aligns_all_sampling() {
    let mut face = load(FaceVariant::aviator_24h(), CalendarTime::new(5, 59, 59, 9));
    let outcome = face.on_tick(
        CalendarTime::new(6, 0, 0, 9),
        TimeUnits::SECOND | TimeUnits::MINUTE | TimeUnits::HOUR,
    );
    assert!(!outcome.forced);
    assert!(outcome.recomputed.contains(Indicator::Second));
    assert!(outcome.recomputed.contains(Indicator::Minute));
    assert!(outcome.recomputed.contains(Indicator::Hour));
    assert!(!outcome.recomputed.contains(Indicator::Date));
    assert_eq!(face.scheduler().hour(), Some(Angle::QUARTER));
}

#[test]
fn midnight_updates_date_label() {
    let start = CalendarTime::new(23, 59, 59, 30);
    let mut face = load(FaceVariant::aviator_24h(), start);
    let date = face.generation().and_then(|g| g.date()).unwrap();
    assert_eq!(face.surface().text_of(date), Some("30"));
    assert_eq!(face.surface().text_updates, 1);

    let next = start.succ();
    let outcome = face.on_tick(next, TimeUnits::between(&start, &next));
    assert!(outcome.changed.contains(Indicator::Date));
    assert_eq!(face.surface().text_of(date), Some("31"));
    assert_eq!(face.surface().text_updates, 2);
    assert_eq!(face.scheduler().hour(), Some(Angle::ZERO));

    // the label is left alone for the rest of the day
    face.on_tick(next.succ(), TimeUnits::SECOND);
    assert_eq!(face.surface().text_updates, 2);
}

#[test]
fn backward_clock_jump_forces_full_recompute() {
    let mut face = load(FaceVariant::aviator_24h(), CalendarTime::new(3, 0, 0, 12));
    face.on_tick(CalendarTime::new(3, 0, 1, 12), TimeUnits::SECOND);

    // DST fall-back: an hour earlier, no day change
    let back = CalendarTime::new(2, 0, 2, 12);
    let outcome = face.on_tick(back, TimeUnits::SECOND);
    assert!(outcome.forced);
    assert!(outcome.redraw);
    assert_eq!(
        face.scheduler().hour(),
        Some(hour_angle(&back, HourDial::TwentyFour))
    );
}

#[test]
fn backward_clock_jump_to_previous_day_forces_full_recompute() {
    let start = CalendarTime::new(1, 5, 0, 6);
    let mut face = load(FaceVariant::aviator_24h(), start);
    let date = face.generation().and_then(|g| g.date()).unwrap();

    let back = CalendarTime::new(19, 5, 1, 5);
    let outcome = face.on_tick(back, TimeUnits::between(&start, &back));
    assert!(outcome.forced);
    assert!(outcome.redraw);
    assert_eq!(
        face.scheduler().hour(),
        Some(hour_angle(&back, HourDial::TwentyFour))
    );
    assert_eq!(face.surface().text_of(date), Some("5"));
}

#[test]
fn forward_clock_jump_keeps_coarsening() {
    let mut face = load(FaceVariant::aviator_24h(), CalendarTime::new(3, 0, 0, 12));
    let outcome = face.on_tick(CalendarTime::new(3, 0, 7, 12), TimeUnits::SECOND);
    assert!(!outcome.forced);
    assert!(!outcome.recomputed.contains(Indicator::Minute));
}

#[test]
fn noon_down_dial_offsets_hour_hand() {
    let face = load(FaceVariant::noon_down_24h(), CalendarTime::new(12, 0, 0, 1));
    assert_eq!(face.scheduler().hour(), Some(Angle::ZERO));
    assert_eq!(face.generation().unwrap().date(), None);
    assert_eq!(face.frame().date.as_str(), "");
}

#[test]
fn twelve_hour_dial_wraps_twice_a_day() {
    let face = load(FaceVariant::classic_12h(), CalendarTime::new(15, 0, 0, 1));
    assert_eq!(face.scheduler().hour(), Some(Angle::QUARTER));
}

// ============================================================================
// Message Handling
// ============================================================================

#[test]
fn multi_entry_message_applies_each_entry_in_order() {
    let now = CalendarTime::new(9, 0, 0, 1);
    let mut face = load(FaceVariant::aviator_24h(), now);
    let message = InboundMessage::new()
        .with_entry(99, "on")
        .with_entry(0, "maybe")
        .with_entry(0, "off")
        .with_entry(1, "on");

    let outcomes = face.handle_message(&message, now);
    assert_eq!(outcomes.len(), 4);
    assert_eq!(
        outcomes[0],
        Ok(ConfigOutcome::Rejected {
            reason: RejectReason::UnknownKey(99)
        })
    );
    assert_eq!(
        outcomes[1],
        Ok(ConfigOutcome::Rejected {
            reason: RejectReason::InvalidValue {
                key: SettingKey::SecondsVisible
            }
        })
    );
    assert_eq!(
        outcomes[2],
        Ok(ConfigOutcome::Applied {
            key: SettingKey::SecondsVisible,
            value: Toggle::Off,
            rebuilt: false
        })
    );
    assert!(matches!(outcomes[3], Ok(ConfigOutcome::Applied { rebuilt: true, .. })));

    assert!(!face.config().seconds_visible);
    assert!(face.config().inverted);
    // the rebuild reinitialized without the hidden second hand
    assert_eq!(face.frame().second, None);
}

#[test]
fn later_entry_for_same_key_wins() {
    let now = CalendarTime::new(9, 0, 0, 1);
    let mut face = load(FaceVariant::aviator_24h(), now);
    let message = InboundMessage::new().with_entry(0, "off").with_entry(0, "on");
    face.handle_message(&message, now);
    assert!(face.config().seconds_visible);
    assert_eq!(face.store().value(SettingKey::SecondsVisible), Some(true));
}

#[test]
fn empty_message_is_a_no_op() {
    let now = CalendarTime::new(9, 0, 0, 1);
    let mut face = load(FaceVariant::aviator_24h(), now);
    let outcomes = face.handle_message(&InboundMessage::new(), now);
    assert!(outcomes.is_empty());
    assert_eq!(face.store().writes, 0);
}

#[test]
fn unsupported_keys_on_fixed_variant() {
    let now = CalendarTime::new(9, 0, 0, 1);
    let mut face = load(FaceVariant::noon_down_24h(), now);

    for (key, setting) in [(0, SettingKey::SecondsVisible), (1, SettingKey::ColorInversion)] {
        let outcome = face.apply_config_update(key, "off", now).unwrap();
        assert_eq!(
            outcome,
            ConfigOutcome::Rejected {
                reason: RejectReason::UnsupportedKey(setting)
            }
        );
    }
    assert!(face.config().seconds_visible);
    assert_eq!(face.store().writes, 0);
    assert_eq!(face.rebuilds(), 0);
}

#[test]
fn classic_variant_rejects_inversion_only() {
    let now = CalendarTime::new(9, 0, 0, 1);
    let mut face = load(FaceVariant::classic_12h(), now);
    assert!(face.apply_config_update(0, "off", now).unwrap().is_applied());
    assert!(!face.apply_config_update(1, "on", now).unwrap().is_applied());
}

#[test]
fn inversion_with_unchanged_value_still_rebuilds() {
    let now = CalendarTime::new(9, 0, 0, 1);
    let mut face = load(FaceVariant::aviator_24h(), now);
    let outcome = face.apply_config_update(1, "off", now).unwrap();
    assert!(matches!(outcome, ConfigOutcome::Applied { rebuilt: true, .. }));
    assert_eq!(face.rebuilds(), 1);
}

#[test]
fn delivery_notifications_are_observational() {
    let now = CalendarTime::new(9, 0, 0, 1);
    let face = load(FaceVariant::aviator_24h(), now);
    let before = face.frame();
    for status in [DeliveryStatus::Sent, DeliveryStatus::Failed, DeliveryStatus::Dropped] {
        face.on_delivery(status);
    }
    assert_eq!(face.frame(), before);
}

// ============================================================================
// Failure Handling
// ============================================================================

#[test]
fn rebuild_failure_restores_previous_configuration() {
    let now = CalendarTime::new(9, 0, 0, 1);
    let mut face = load(FaceVariant::aviator_24h(), now);
    face.surface_mut().fail_after = Some(1);

    let result = face.apply_config_update(1, "on", now);
    assert!(matches!(
        result,
        Err(FaceError::RebuildFailed { restored: true, .. })
    ));

    assert!(!face.config().inverted);
    assert_eq!(face.store().value(SettingKey::ColorInversion), Some(false));
    let generation = face.generation().unwrap();
    assert_eq!(generation.theme().background, Background::Normal);
    // no leaked or double-freed resources
    assert_eq!(face.surface().live().len(), 3);
    assert_eq!(face.surface().invalid_destroys, 0);
    assert!(face
        .surface()
        .has_live(ResourceKind::Background(Background::Normal)));
    assert!(face.frame().hour.is_some());
}

#[test]
fn unrecovered_rebuild_leaves_face_bare_until_retry() {
    let now = CalendarTime::new(9, 0, 0, 1);
    let mut face = load(FaceVariant::aviator_24h(), now);
    face.surface_mut().fail_always = true;

    let result = face.apply_config_update(1, "on", now);
    assert!(matches!(
        result,
        Err(FaceError::RebuildFailed { restored: false, .. })
    ));
    assert!(face.generation().is_none());
    assert!(face.surface().live().is_empty());

    // ticks keep the cache current without touching the surface
    let marks = face.surface().dirty_marks;
    face.on_tick(now.succ(), TimeUnits::SECOND);
    assert_eq!(face.surface().dirty_marks, marks);

    face.surface_mut().fail_always = false;
    face.rebuild(now.succ()).unwrap();
    assert_eq!(face.surface().live().len(), 3);
    assert!(face.frame().theme.is_some());
}

#[test]
fn store_write_failure_is_not_fatal() {
    let now = CalendarTime::new(9, 0, 0, 1);
    let face = load(FaceVariant::aviator_24h(), now);
    // reach the store through a round trip
    let (surface, mut store) = face.unload();
    store.fail_writes = true;
    let mut face =
        WatchFace::load(surface, store, FaceVariant::aviator_24h(), now).unwrap();

    let outcome = face.apply_config_update(0, "off", now).unwrap();
    assert!(outcome.is_applied());
    assert!(!face.config().seconds_visible);
    assert!(face.settings().has_unsaved());
    assert_eq!(face.store().failed_writes, 1);
}

#[test]
fn store_read_failure_falls_back_to_defaults() {
    let mut store = MockStore::new().with_value(SettingKey::SecondsVisible, false);
    store.fail_reads = true;
    let face = WatchFace::load(
        MockSurface::new(),
        store,
        FaceVariant::aviator_24h(),
        CalendarTime::new(0, 0, 0, 1),
    )
    .unwrap();
    assert!(face.config().seconds_visible);
    assert!(!face.config().inverted);
}

#[test]
fn load_failure_reports_surface_error() {
    let mut surface = MockSurface::new();
    surface.fail_after = Some(2);
    let result = WatchFace::load(
        surface,
        MockStore::new(),
        FaceVariant::aviator_24h(),
        CalendarTime::new(0, 0, 0, 1),
    );
    assert!(matches!(result, Err(FaceError::Surface(()))));
}
