//! Round-trip laws for the built-in converters:
//! `decode(encode(v)) == v` for every value the converter accepts, and
//! `encode(decode(w)) == w` for wire text the converter produced.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, TimeZone};
use proptest::prelude::*;
use tagjson_registry::builtin::{
    DateConverter, DateTimeConverter, TimeConverter, TimeDeltaConverter, UuidConverter,
};
use tagjson_registry::{Converter, ConverterRegistry};
use tagjson_types::{NativeValue, OffsetTime};
use uuid::Uuid;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn offset_strategy() -> impl Strategy<Value = FixedOffset> {
    (-(23 * 60 + 59)..=(23 * 60 + 59))
        .prop_map(|minutes: i32| FixedOffset::east_opt(minutes * 60).unwrap())
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1i32..=9999, 1u32..=366)
        .prop_filter_map("valid ordinal", |(y, d)| NaiveDate::from_yo_opt(y, d))
}

fn time_strategy() -> impl Strategy<Value = OffsetTime> {
    (0u32..24, 0u32..60, 0u32..60, offset_strategy())
        .prop_map(|(h, m, s, offset)| OffsetTime::from_hms(h, m, s, offset).unwrap())
}

fn datetime_strategy() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (
        date_strategy(),
        0u32..24,
        0u32..60,
        0u32..60,
        0u32..1_000_000_000,
        offset_strategy(),
    )
        .prop_filter_map("representable local time", |(date, h, m, s, nanos, offset)| {
            let naive = date.and_hms_nano_opt(h, m, s, nanos)?;
            offset.from_local_datetime(&naive).single()
        })
}

fn timedelta_strategy() -> impl Strategy<Value = TimeDelta> {
    (-10_000_000_000i64..10_000_000_000, 0u32..1_000_000_000)
        .prop_filter_map("in range", |(secs, nanos)| TimeDelta::new(secs, nanos))
}

fn uuid_strategy() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

// =============================================================================
// decode(encode(v)) == v
// =============================================================================

proptest! {
    #[test]
    fn date_round_trips(date in date_strategy()) {
        let wire = DateConverter.encode(&date).unwrap();
        prop_assert_eq!(DateConverter.decode(&wire).unwrap(), date);
    }

    #[test]
    fn time_round_trips(time in time_strategy()) {
        let wire = TimeConverter.encode(&time).unwrap();
        prop_assert_eq!(TimeConverter.decode(&wire).unwrap(), time);
    }

    #[test]
    fn datetime_round_trips(dt in datetime_strategy()) {
        let wire = DateTimeConverter.encode(&dt).unwrap();
        let back = DateTimeConverter.decode(&wire).unwrap();
        prop_assert_eq!(back, dt);
        prop_assert_eq!(back.offset(), dt.offset());
    }

    #[test]
    fn timedelta_round_trips(delta in timedelta_strategy()) {
        let wire = TimeDeltaConverter.encode(&delta).unwrap();
        prop_assert_eq!(TimeDeltaConverter.decode(&wire).unwrap(), delta);
    }

    #[test]
    fn uuid_round_trips(id in uuid_strategy()) {
        let wire = UuidConverter.encode(&id).unwrap();
        prop_assert_eq!(UuidConverter.decode(&wire).unwrap(), id);
    }
}

// =============================================================================
// encode(decode(w)) == w, through the registry envelope
// =============================================================================

proptest! {
    #[test]
    fn produced_wrappers_are_stable(
        date in date_strategy(),
        time in time_strategy(),
        dt in datetime_strategy(),
        delta in timedelta_strategy(),
        id in uuid_strategy(),
    ) {
        let registry = ConverterRegistry::with_builtins();
        let natives = [
            NativeValue::new(date),
            NativeValue::new(time),
            NativeValue::new(dt),
            NativeValue::new(delta),
            NativeValue::new(id),
        ];
        for native in natives {
            let wrapper = registry.wrap(&native).unwrap();
            let decoded = registry.json_to_value(&wrapper).unwrap();
            prop_assert_eq!(&decoded, &native);
            prop_assert_eq!(registry.wrap(&decoded).unwrap(), wrapper);
        }
    }
}
