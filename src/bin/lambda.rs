//! AWS Lambda HTTP handler
//!
//! POST a scenario JSON document; the response body is the projection result.
//! Malformed or invalid scenarios get a 400 with `{"error": "..."}`.

use lambda_http::{run, service_fn, Body, Request, Response};
use lambda_runtime::Error;
use serde_json::json;

use savings_projection::scenario::load_scenarios_from_reader;
use savings_projection::ScenarioRunner;

fn json_response(status: u16, body: &serde_json::Value) -> Result<Response<Body>, Error> {
    let response = Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?;
    Ok(response)
}

fn bad_request(message: String) -> Result<Response<Body>, Error> {
    log::warn!("rejected request: {}", message);
    json_response(400, &json!({ "error": message }))
}

async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let body: &[u8] = event.body().as_ref();

    let scenarios = match load_scenarios_from_reader(body) {
        Ok(scenarios) => scenarios,
        Err(e) => return bad_request(format!("invalid scenario document: {}", e)),
    };

    for scenario in &scenarios {
        if let Err(e) = scenario.validate() {
            return bad_request(format!("scenario {:?}: {}", scenario.name, e));
        }
    }

    let outcomes = ScenarioRunner::starting_now().run_all(&scenarios);
    let payload = match outcomes.as_slice() {
        [single] => serde_json::to_value(&single.result)?,
        _ => serde_json::to_value(&outcomes)?,
    };
    json_response(200, &payload)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn call(body: &str) -> (u16, Value) {
        let response = handler(Request::new(Body::from(body))).await.unwrap();
        let status = response.status().as_u16();
        let payload = serde_json::from_slice(response.body().as_ref()).unwrap();
        (status, payload)
    }

    #[tokio::test]
    async fn test_single_scenario_returns_result() {
        let (status, payload) = call(
            r#"{"goal": 300, "start": "2025-10-20T08:00:00Z",
                "streams": [{"id": "pay", "kind": "income", "amount": 100, "frequency": "weekly"}]}"#,
        )
        .await;

        assert_eq!(status, 200);
        let series = payload["series"].as_array().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0]["label"], "Total Savings");
        // origin + 3 weeks
        assert_eq!(series[0]["points"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_many_scenarios_return_outcomes() {
        let (status, payload) = call(
            r#"[
                {"name": "a", "goal": 100, "streams": [{"id": "s", "kind": "income", "amount": 50, "frequency": "weekly"}]},
                {"name": "b", "goal": 100, "max_steps": 1, "streams": [{"id": "s", "kind": "income", "amount": 50, "frequency": "weekly"}]}
            ]"#,
        )
        .await;

        assert_eq!(status, 200);
        let outcomes = payload.as_array().unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0]["name"], "a");
        assert_eq!(outcomes[0]["goal_reached"], true);
        assert_eq!(outcomes[1]["goal_reached"], false);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (status, payload) = call("{not json").await;
        assert_eq!(status, 400);
        assert!(payload["error"].as_str().unwrap().starts_with("invalid scenario document"));
    }

    #[tokio::test]
    async fn test_unknown_kind_is_bad_request() {
        let (status, payload) = call(
            r#"{"goal": 100, "streams": [{"id": "s", "kind": "transfer", "amount": 50}]}"#,
        )
        .await;
        assert_eq!(status, 400);
        assert!(payload["error"].is_string());
    }

    #[tokio::test]
    async fn test_invalid_scenarios_are_bad_requests() {
        let stream = r#"[{"id": "s", "kind": "income", "amount": 50, "frequency": "weekly"}]"#;

        let (status, payload) = call(&format!(r#"{{"name": "nogoal", "streams": {}}}"#, stream)).await;
        assert_eq!(status, 400);
        let message = payload["error"].as_str().unwrap();
        assert!(message.contains("nogoal"));
        assert!(message.contains("goal is required"));

        let (status, _) = call(&format!(r#"{{"goal": -5, "streams": {}}}"#, stream)).await;
        assert_eq!(status, 400);

        let (status, _) = call(r#"{"goal": 100, "streams": []}"#).await;
        assert_eq!(status, 400);
    }
}
