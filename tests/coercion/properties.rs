//! Property tests: canonical text parses back to the same value

use crate::common::*;
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;
use schemata::{parse, Document, File, Image};

proptest! {
    #[test]
    fn integers_round_trip_through_text(v in any::<i64>()) {
        let value = parse(PrimitiveKind::Int64, &RawValue::from(v.to_string())).unwrap();
        prop_assert_eq!(value, Value::Int64(v));
    }

    #[test]
    fn int16_accepts_exactly_its_width(v in any::<i32>()) {
        let result = parse(PrimitiveKind::Int16, &RawValue::Int(i64::from(v)));
        prop_assert_eq!(result.is_ok(), i16::try_from(v).is_ok());
    }

    #[test]
    fn decimals_round_trip_through_text(units in any::<i64>(), scale in 0i64..12) {
        let decimal = BigDecimal::new(units.into(), scale);
        let value = parse(PrimitiveKind::Numeric, &RawValue::from(decimal.to_string())).unwrap();
        prop_assert_eq!(value, Value::Numeric(decimal));
    }

    #[test]
    fn dates_and_times_round_trip(days in 0i64..200_000, secs in 0u32..86_400, millis in 0u32..1000) {
        let date = NaiveDate::from_ymd_opt(1500, 1, 1).unwrap() + chrono::Duration::days(days);
        let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, millis * 1_000_000).unwrap();
        for value in [Value::Date(date), Value::Time(time), Value::DateTime(date.and_time(time))] {
            let kind = value.kind();
            prop_assert_eq!(parse(kind, &RawValue::from(value.to_string())).unwrap(), value);
        }
    }

    #[test]
    fn binary_round_trips(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let value = Value::Binary(bytes.clone());
        prop_assert_eq!(parse(PrimitiveKind::Binary, &RawValue::from(value.to_string())).unwrap(), value);
    }

    #[test]
    fn composites_round_trip(
        content in prop::collection::vec(any::<u8>(), 0..48),
        thumbnail in prop::collection::vec(any::<u8>(), 0..16),
        text in "[ -~]{0,40}",
    ) {
        let file = File::from_parts(content.clone(), "application/octet-stream");
        prop_assert_eq!(File::decode(&file.encode()).unwrap(), file);

        let image = Image::from_parts(content.clone(), thumbnail, "image/png");
        prop_assert_eq!(Image::decode(&image.encode()).unwrap(), image);

        let document = Document::from_parts(content, text.as_str(), "text/plain");
        let decoded = Document::decode(&document.encode()).unwrap();
        prop_assert_eq!(decoded.text(), text.as_str());
        prop_assert_eq!(decoded, document);
    }

    #[test]
    fn booleans_reject_other_integers(v in any::<i64>()) {
        let result = parse(PrimitiveKind::Boolean, &RawValue::Int(v));
        prop_assert_eq!(result.is_ok(), v == 0 || v == 1);
    }
}
