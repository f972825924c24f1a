use synaptix::kernel::profile::profile;
use synaptix::kernel::record::{Domain, LogLine, Payload, TelemetryRecord, Vitals};
use synaptix::outputs::feed::{clock_time, FeedItem};

#[test]
fn test_clock_time_extraction() {
    assert_eq!(clock_time("2024-05-01T12:34:56.789123"), "12:34:56");
    assert_eq!(clock_time("2024-05-01T12:34:56"), "12:34:56");
    assert_eq!(clock_time("12:34"), "12:34");
}

#[test]
fn test_vitals_row() {
    let record = TelemetryRecord::new(
        "2024-05-01T08:00:00.5",
        Payload::Healthcare(Vitals {
            patient_id: Some("ICU-04".to_string()),
            bpm: Some(45.0),
            spo2: Some(60.0),
            notes: Some("SPO2 FAILURE - HYPOXIA".to_string()),
        }),
    );
    let item = FeedItem::render(&record, true);
    assert_eq!(item.domain, Domain::Healthcare);
    assert_eq!(item.headline, "ICU-04");
    assert_eq!(item.detail, "BPM: 45 | SpO2: 60%");
    assert!(item.to_string().starts_with("!! 08:00:00  ICU-04"));
}

#[test]
fn test_log_row_with_missing_fields() {
    let record = TelemetryRecord::new("2024-05-01T08:00:00", Payload::Devops(LogLine::default()));
    let item = FeedItem::render(&record, false);
    assert_eq!(item.headline, "--");
    assert_eq!(item.detail, "--");
    assert!(item.to_string().starts_with("   08:00:00"));
}

#[test]
fn test_profiles_cover_every_domain() {
    for domain in Domain::ALL {
        assert_eq!(profile(domain).domain, domain);
    }
    assert_eq!(profile(Domain::Finance).rule.field, "max_drawdown");
    assert_eq!(profile(Domain::Healthcare).rule.default_value, 140);
    assert_eq!(profile(Domain::Devops).display.title, "DevOps Sentinel");
}
