use estab_matcher::model::{Confidence, MatchFailure};
use estab_matcher::summary::ScoreBand;
use estab_matcher::{run, Dataset, MatchConfig};

const CONFIG: &str = r#"
name = "Sample establishments"

[source]
file = "source_data.csv"
address = "address"

[registry]
file = "kbo_data.csv"
addresses = ["Address NL", "Address FR"]
"#;

fn source() -> Dataset {
    Dataset::from_strings(
        "source",
        &["Enterprise Number", "address", "company_name", "contact_person"],
        &[
            &["123456789", "Rue de la Paix 123, 1000 Brussels", "Company A", "John Doe"],
            &["987654321", "Avenue Louise 456, 1050 Ixelles", "Company B", "Jane Smith"],
            &["111222333", "Chaussee de Wavre 789, 1040 Etterbeek", "Company C", "Bob Johnson"],
            &["444555666", "Meir 1, 2000 Antwerpen", "Company D", "Ann Peeters"],
            &["", "Grote Markt 1, 1000 Brussel", "Company E", "Piet Janssens"],
        ],
    )
}

fn registry() -> Dataset {
    Dataset::from_strings(
        "kbo",
        &["EnterpriseNumber", "EntityNumber", "Address NL", "Address FR"],
        &[
            &["123456789", "EST001", "Vredestraat 123, 1000 Brussel", "Rue de la Paix 123, 1000 Bruxelles"],
            &["123456789", "EST002", "Oorlogstraat 456, 1000 Brussel", "Rue de la Guerre 456, 1000 Bruxelles"],
            &["987654321", "EST003", "Louizalaan 456, 1050 Elsene", "Avenue Louise 456, 1050 Ixelles"],
            &["987654321", "EST004", "Anspachlaan 789, 1000 Brussel", "Boulevard Anspach 789, 1000 Bruxelles"],
            &["111222333", "EST005", "Waversesteenweg 789, 1040 Etterbeek", "Chaussée de Wavre 789, 1040 Etterbeek"],
        ],
    )
}

#[test]
fn sample_data_resolves_each_enterprise() {
    let config = MatchConfig::from_toml(CONFIG).unwrap();
    let report = run(&config, &source(), &registry()).unwrap();

    let units: Vec<Option<&str>> = report
        .rows
        .iter()
        .map(|r| r.establishment_unit_number.as_deref())
        .collect();
    assert_eq!(units, vec![Some("EST001"), Some("EST003"), Some("EST005"), None, None]);

    let columns: Vec<Option<&str>> = report
        .rows
        .iter()
        .map(|r| r.best_match_address_column.as_deref())
        .collect();
    assert_eq!(
        columns,
        vec![Some("Address FR"), Some("Address FR"), Some("Address FR"), None, None]
    );

    // Exact French address is a perfect match
    assert_eq!(report.rows[1].dice_score, 1.0);
    assert_eq!(report.rows[1].confidence, Some(Confidence::High));

    assert_eq!(report.rows[3].error_kind, Some(MatchFailure::NoCandidates));
    assert_eq!(
        report.rows[3].error.as_deref(),
        Some("No KBO data found for enterprise number: 444555666")
    );
    assert_eq!(report.rows[4].error_kind, Some(MatchFailure::MissingIdentifier));
    assert_eq!(report.rows[4].source_address.as_deref(), Some("Grote Markt 1, 1000 Brussel"));
}

#[test]
fn sample_data_summary() {
    let config = MatchConfig::from_toml(CONFIG).unwrap();
    let report = run(&config, &source(), &registry()).unwrap();
    let s = &report.summary;

    assert_eq!(s.total_rows, 5);
    assert_eq!(s.successful_matches, 3);
    assert_eq!(s.high_confidence_matches, 3);
    assert!((s.success_rate - 60.0).abs() < 1e-9);
    assert_eq!(s.failure_counts[&MatchFailure::NoCandidates], 1);
    assert_eq!(s.failure_counts[&MatchFailure::MissingIdentifier], 1);

    let excellent = s
        .score_bands
        .iter()
        .find(|b| b.band == ScoreBand::Excellent)
        .unwrap();
    assert_eq!(excellent.count, 2);

    assert_eq!(report.meta.config_name, "Sample establishments");
    assert_eq!(report.meta.source_rows, 5);
    assert_eq!(report.meta.registry_rows, 5);
}

#[test]
fn raising_threshold_only_relabels() {
    let strict = format!("{CONFIG}\n[scoring]\nmin_score = 0.9\n");
    let config = MatchConfig::from_toml(&strict).unwrap();
    let report = run(&config, &source(), &registry()).unwrap();

    // Same winners, fewer high-confidence labels
    assert_eq!(report.summary.successful_matches, 3);
    assert_eq!(report.summary.high_confidence_matches, 2);
    assert_eq!(report.rows[0].confidence, Some(Confidence::Low));
    assert_eq!(report.rows[0].establishment_unit_number.as_deref(), Some("EST001"));
}

#[test]
fn report_serializes_to_json() {
    let config = MatchConfig::from_toml(CONFIG).unwrap();
    let report = run(&config, &source(), &registry()).unwrap();
    let json: serde_json::Value = serde_json::to_value(&report).unwrap();

    assert_eq!(json["summary"]["successful_matches"], 3);
    assert_eq!(json["summary"]["failure_counts"]["no_candidates"], 1);
    assert_eq!(json["rows"][0]["establishment_unit_number"], "EST001");
    assert_eq!(json["rows"][0]["source_fields"]["company_name"], "Company A");
    assert_eq!(json["rows"][3]["success"], false);
}
