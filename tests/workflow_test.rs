use panorama::embed::EmbeddingConfig;
use panorama::engine::EngineConfig;
use panorama::roster::{EmployeeRecord, Roster, SurveyId, TenantId};
use panorama::workflow::memory::{InMemoryAssignmentStore, InMemoryRosterProvider};
use panorama::workflow::{generate_assignments, SurveyType, TargetType, WorkflowError};

fn test_config() -> EngineConfig {
    EngineConfig {
        embedding: EmbeddingConfig {
            dimension: 16,
            walk_length: 10,
            walks_per_node: 20,
            seed: 3,
            ..EmbeddingConfig::default()
        },
        ..EngineConfig::default()
    }
}

fn team_roster() -> Roster {
    Roster::from_records(vec![
        EmployeeRecord::new("mgr", 1),
        EmployeeRecord::new("dev-1", 2).with_direct_supervisor("mgr"),
        EmployeeRecord::new("dev-2", 3).with_direct_supervisor("mgr"),
        EmployeeRecord::new("dev-3", 4).with_direct_supervisor("mgr"),
    ])
}

#[tokio::test]
async fn test_three_sixty_survey_persists_employee_rows() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let provider = InMemoryRosterProvider::new().with_tenant("acme", team_roster());
    let store = InMemoryAssignmentStore::new();
    let tenant = TenantId::new("acme");
    let survey = SurveyId::new("survey-1");

    let generated = generate_assignments(
        &provider,
        &store,
        &tenant,
        &survey,
        SurveyType::ThreeSixty,
        test_config(),
    )
    .await
    .unwrap();

    assert_eq!(generated.suggestions.len(), 4);
    let expected_rows: usize = generated.suggestions.values().map(Vec::len).sum();
    assert_eq!(generated.records.len(), expected_rows);

    for record in &generated.records {
        assert_eq!(record.survey_id, survey);
        assert_eq!(record.survey_type, SurveyType::ThreeSixty);
        assert_eq!(record.target_type, TargetType::Employee);
        assert!(record.target_employee_id.is_some());
        assert!(record.relation.is_some());
    }

    assert_eq!(store.records().len(), generated.records.len());
}

#[tokio::test]
async fn test_company_wide_survey_takes_non_ml_path() {
    let provider = InMemoryRosterProvider::new().with_tenant("acme", team_roster());
    let store = InMemoryAssignmentStore::new();

    let generated = generate_assignments(
        &provider,
        &store,
        &TenantId::new("acme"),
        &SurveyId::new("survey-2"),
        SurveyType::CompanyWide,
        test_config(),
    )
    .await
    .unwrap();

    assert!(generated.suggestions.is_empty());
    assert_eq!(generated.records.len(), 4);
    for record in &generated.records {
        assert_eq!(record.target_type, TargetType::Company);
        assert!(record.target_employee_id.is_none());
        assert!(record.relation.is_none());
    }
}

#[tokio::test]
async fn test_failed_run_persists_nothing() {
    // An empty roster is a fatal engine error; the store must stay empty.
    let provider = InMemoryRosterProvider::new().with_tenant("empty", Roster::new());
    let store = InMemoryAssignmentStore::new();

    let result = generate_assignments(
        &provider,
        &store,
        &TenantId::new("empty"),
        &SurveyId::new("survey-3"),
        SurveyType::ThreeSixty,
        test_config(),
    )
    .await;

    assert!(matches!(result, Err(WorkflowError::Engine(_))));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_unknown_tenant_is_a_collaborator_error() {
    let provider = InMemoryRosterProvider::new();
    let store = InMemoryAssignmentStore::new();

    let result = generate_assignments(
        &provider,
        &store,
        &TenantId::new("ghost"),
        &SurveyId::new("survey-4"),
        SurveyType::ThreeSixty,
        test_config(),
    )
    .await;

    assert!(matches!(result, Err(WorkflowError::Collaborator(_))));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_rerunning_survey_does_not_duplicate_rows() {
    let provider = InMemoryRosterProvider::new().with_tenant("acme", team_roster());
    let store = InMemoryAssignmentStore::new();
    let tenant = TenantId::new("acme");
    let survey = SurveyId::new("survey-5");

    let first = generate_assignments(
        &provider,
        &store,
        &tenant,
        &survey,
        SurveyType::ThreeSixty,
        test_config(),
    )
    .await
    .unwrap();
    generate_assignments(
        &provider,
        &store,
        &tenant,
        &survey,
        SurveyType::ThreeSixty,
        test_config(),
    )
    .await
    .unwrap();

    // The composite key (employee, survey, target, type) dedupes the rerun.
    assert_eq!(store.records().len(), first.records.len());
}
