use super::*;

const HEADER: &str = "Welfare_Indicator,Welfare_Hazards_Animal,Welfare_Hazards_Consequences,Indicator_Ease,Ease_of_Hazard_Mitigation,Indicator_Resources,Welfare_Hazards_Impact";

fn csv(lines: &[&str]) -> String {
    let mut out = String::from(HEADER);
    for line in lines {
        out.push('\n');
        out.push_str(line);
    }
    out
}

#[test]
fn test_rows_map_labels_to_levels() {
    let data = csv(&["Lameness,Hard flooring,Pain, easy ,MODERATE,Low,High"]);
    let rows = read_rows(data.as_bytes()).unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.indicator, "Lameness");
    assert_eq!(row.ease, EaseLevel::Easy);
    assert_eq!(row.mitigation, EaseLevel::Moderate);
    assert_eq!(row.resources, ResourceLevel::Low);
    assert_eq!(row.impact, Some(ImpactLevel::High));
}

#[test]
fn test_impact_column_is_optional() {
    let data = "Welfare_Indicator,Welfare_Hazards_Animal,Welfare_Hazards_Consequences,Indicator_Ease,Ease_of_Hazard_Mitigation,Indicator_Resources\nLameness,Hard flooring,Pain,Easy,Easy,Low";
    let rows = read_rows(data.as_bytes()).unwrap();

    assert_eq!(rows[0].impact, None);
}

#[test]
fn test_missing_required_column() {
    let data = "Welfare_Indicator,Welfare_Hazards_Animal,Indicator_Ease\nA,h,Easy";
    let err = read_rows(data.as_bytes()).unwrap_err();

    assert!(matches!(err, DatasetError::MissingColumn(CONSEQUENCE)));
}

#[test]
fn test_unknown_label_names_column() {
    let data = csv(&["A,h,c,Easy,Easy,Low,", "B,h,c,Easy,Trivial,Low,"]);
    let err = read_rows(data.as_bytes()).unwrap_err();

    match err {
        DatasetError::Mapping(DataMappingError::UnknownLabel { column, label, .. }) => {
            assert_eq!(column, MITIGATION);
            assert_eq!(label, "Trivial");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_blank_indicator_reports_row() {
    let data = csv(&["A,h,c,Easy,Easy,Low,", ",h,c,Easy,Easy,Low,"]);
    let err = read_rows(data.as_bytes()).unwrap_err();

    assert!(matches!(
        err,
        DatasetError::Mapping(DataMappingError::MissingValue {
            column: INDICATOR,
            row: 2
        })
    ));
}

#[test]
fn test_blank_resources_is_missing_value() {
    let data = csv(&["A,h,c,Easy,Easy,,Low"]);
    let err = read_rows(data.as_bytes()).unwrap_err();

    assert!(matches!(
        err,
        DatasetError::Mapping(DataMappingError::MissingValue {
            column: RESOURCES,
            row: 1
        })
    ));
}

#[test]
fn test_catalog_averages_and_skips_blank_categories() {
    let data = csv(&[
        "A,h1,c1,Easy,Easy,Low,High",
        "A,h2,,Difficult,Easy,High,Low",
        "B,,c1,Moderate,Moderate,Medium,",
    ]);
    let catalog = read_catalog(data.as_bytes()).unwrap();

    assert_eq!(catalog.indicator_count(), 2);
    assert_eq!(catalog.hazards().len(), 2);
    assert_eq!(catalog.consequences().len(), 1);

    let a = catalog.indicator("A").unwrap();
    assert_eq!(a.attributes.ease, 2.0);
    assert_eq!(a.attributes.resources, 2.0);
    assert_eq!(a.attributes.impact, Some(1.5));
    assert!(catalog.consequences()[0].is_covered_by("B"));
}
