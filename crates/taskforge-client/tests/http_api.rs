//! HTTP client tests against an in-process solver service.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use taskforge_client::{
    ApiError, HttpSolverApi, RefreshOutcome, SessionController, SessionState, SolveRequest,
    SolverApi,
};
use taskforge_config::ClientConfig;
use taskforge_core::{ConstraintKey, ConstraintWeights, Schedule, Score, SolverStatus};
use taskforge_test::demo_data::{self, DemoData};
use taskforge_test::ScheduleBuilder;

#[derive(Default)]
struct ServiceState {
    jobs: Vec<(String, Schedule)>,
    requests: Vec<Value>,
    stopped: Vec<String>,
}

type Shared = Arc<Mutex<ServiceState>>;

fn error_body(status: StatusCode, message: &str) -> Response {
    let body = json!({
        "message": message,
        "code": "NOT_FOUND",
        "id": "err-42",
    });
    (status, Json(body)).into_response()
}

async fn list_demo_data() -> Json<Vec<String>> {
    Json(demo_data::dataset_ids())
}

async fn get_demo_data(Path(id): Path<String>) -> Response {
    match demo_data::by_id(&id) {
        Some(schedule) => Json(schedule).into_response(),
        None => error_body(StatusCode::NOT_FOUND, &format!("Unknown dataset {id}")),
    }
}

async fn start_solving(State(state): State<Shared>, Json(body): Json<Value>) -> Json<String> {
    let request: SolveRequest = serde_json::from_value(body.clone()).unwrap();
    let mut state = state.lock();
    state.requests.push(body);
    let job_id = format!("job-{}", state.jobs.len() + 1);
    // The "solver" assigns everything at once and keeps running.
    let solved = ScheduleBuilder::from_schedule(request.schedule)
        .assign_round_robin()
        .score(Score::of(0, -90))
        .solving()
        .build();
    state.jobs.push((job_id.clone(), solved));
    Json(job_id)
}

async fn list_jobs(State(state): State<Shared>) -> Json<Vec<String>> {
    Json(state.lock().jobs.iter().map(|(id, _)| id.clone()).collect())
}

async fn get_job(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let state = state.lock();
    match state.jobs.iter().find(|(job_id, _)| *job_id == id) {
        Some((_, schedule)) => Json(schedule.clone()).into_response(),
        // Deliberately unstructured.
        None => (StatusCode::NOT_FOUND, "no such job").into_response(),
    }
}

async fn stop_job(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = state.lock();
    if id == "broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").into_response();
    }
    state.stopped.push(id.clone());
    match state.jobs.iter_mut().find(|(job_id, _)| *job_id == id) {
        Some((_, schedule)) => {
            schedule.solver_status = SolverStatus::NotSolving;
            Json(schedule.clone()).into_response()
        }
        None => error_body(StatusCode::NOT_FOUND, "Job not found"),
    }
}

async fn analyze(Json(schedule): Json<Schedule>) -> Json<Value> {
    let unassigned = schedule.tasks.iter().filter(|t| !t.is_assigned()).count() as i64;
    Json(json!({
        "constraints": [
            {
                "name": "Balance resource load",
                "weight": "0hard/50soft",
                "score": "0hard/-20soft",
                "matches": []
            },
            {
                "name": "Required skill missing",
                "weight": "100hard/0soft",
                "score": format!("{}hard/0soft", -unassigned),
                "matches": [
                    { "name": "Required skill missing", "score": "-1hard/0soft", "justification": "task-1" }
                ]
            }
        ]
    }))
}

async fn spawn_service() -> (String, Shared) {
    let state = Shared::default();
    let app = Router::new()
        .route("/demo-data", get(list_demo_data))
        .route("/demo-data/{id}", get(get_demo_data))
        .route("/schedules", get(list_jobs).post(start_solving))
        .route("/schedules/analyze", put(analyze))
        .route("/schedules/{id}", get(get_job).delete(stop_job))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

#[tokio::test]
async fn test_list_and_fetch_demo_data() {
    let (url, _) = spawn_service().await;
    let api = HttpSolverApi::new(url);

    assert_eq!(api.list_demo_data().await.unwrap(), vec!["SMALL", "MEDIUM"]);

    let schedule = api.fetch_demo_data("MEDIUM").await.unwrap();
    assert_eq!(schedule, demo_data::generate(DemoData::Medium));
}

#[tokio::test]
async fn test_structured_error_body() {
    let (url, _) = spawn_service().await;
    let api = HttpSolverApi::new(url);

    let err = api.fetch_demo_data("LARGE").await.unwrap_err();

    let ApiError::Status { status, info } = &err else {
        panic!("expected status error, got {err:?}");
    };
    assert_eq!(*status, 404);
    let info = info.as_ref().unwrap();
    assert_eq!(info.message, "Unknown dataset LARGE");
    assert_eq!(info.id.as_deref(), Some("err-42"));
    assert_eq!(err.to_string(), "Server responded with status 404: Unknown dataset LARGE");
}

#[tokio::test]
async fn test_unstructured_error_body() {
    let (url, _) = spawn_service().await;
    let api = HttpSolverApi::new(url);

    let err = api.fetch_schedule("job-99").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 404,
            info: None
        }
    );

    let err = api.stop_solving("broken").await.unwrap_err();
    assert!(err.info().is_none());
}

#[tokio::test]
async fn test_transport_error() {
    // Nothing listens on port 1.
    let api = HttpSolverApi::new("http://127.0.0.1:1");
    assert!(matches!(
        api.list_demo_data().await,
        Err(ApiError::Transport(_))
    ));
}

#[tokio::test]
async fn test_solve_request_wire_format() {
    let (url, state) = spawn_service().await;
    let api = HttpSolverApi::new(url);
    let weights = ConstraintWeights::default().with(ConstraintKey::MinimizeDuration, 0);
    let request = SolveRequest::new(demo_data::generate(DemoData::Small), weights);

    let job_id = api.start_solving(&request).await.unwrap();
    assert_eq!(job_id, "job-1");
    assert_eq!(api.list_jobs().await.unwrap(), vec!["job-1"]);

    let body = state.lock().requests[0].clone();
    assert_eq!(body["resources"].as_array().unwrap().len(), 3);
    assert_eq!(body["tasks"][0]["requiredSkill"], "python");
    assert_eq!(body["solverStatus"], "NOT_SOLVING");
    assert!(body.get("score").is_none());
    assert_eq!(
        body["constraintWeights"],
        json!({
            "requiredSkill": 100,
            "resourceCapacity": 100,
            "minimizeDuration": 0,
            "balanceLoad": 50
        })
    );
}

#[tokio::test]
async fn test_analyze_parses_string_scores() {
    let (url, _) = spawn_service().await;
    let api = HttpSolverApi::new(url);

    let analysis = api
        .analyze(&demo_data::generate(DemoData::Small))
        .await
        .unwrap();

    assert_eq!(analysis.constraints.len(), 2);
    let skill = analysis.constraint("Required skill missing").unwrap();
    assert_eq!(skill.score, Score::of(-10, 0));
    assert_eq!(skill.match_count(), 1);
    assert_eq!(skill.matches[0].justification, "task-1");
}

#[tokio::test]
async fn test_session_over_http() {
    let (url, state) = spawn_service().await;
    let config = ClientConfig::new().with_base_url(url);
    let session = SessionController::from_config(&config).unwrap();

    session.select_dataset("SMALL").await.unwrap();
    let job_id = session.solve().await.unwrap();
    assert_eq!(session.state(), SessionState::Solving);

    assert_eq!(
        session.refresh().await.unwrap(),
        RefreshOutcome::Applied { terminal: false }
    );
    let schedule = session.schedule().unwrap();
    assert_eq!(schedule.score, Some(Score::of(0, -90)));
    assert!(schedule.tasks.iter().all(|t| t.is_assigned()));

    let analysis = session.analyze().await.unwrap();
    assert_eq!(analysis.names()[0], "Balance resource load");

    let outcome = session.stop().await.unwrap();
    assert!(outcome.terminated);
    assert_eq!(session.state(), SessionState::DatasetLoaded);
    assert_eq!(state.lock().stopped, vec![job_id]);
    assert_eq!(
        session.schedule().unwrap().solver_status,
        SolverStatus::NotSolving
    );
}
