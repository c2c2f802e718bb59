//! Prediction handler

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::Serialize;

use crate::{AppState, AppError, AppResult};
use crate::inference::{service::FeatureEcho, RawInputs};
use crate::model::Diagnosis;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: Diagnosis,
    pub confidence: String,
    pub input_features: FeatureEcho,
}

/// Submitted features, from a url-encoded form or a JSON object
#[derive(Debug)]
pub struct FeatureSubmission(pub RawInputs);

#[async_trait]
impl<S> FromRequest<S> for FeatureSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| v.to_str().unwrap_or_default().to_string());

        let Some(content_type) = content_type else {
            // A bare POST carries no fields; every feature takes its default.
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::Prediction(e.body_text()))?;
            if body.is_empty() {
                return Ok(Self(RawInputs::default()));
            }
            return Err(AppError::Prediction(
                "Form requests must have `Content-Type: application/x-www-form-urlencoded`".to_string(),
            ));
        };

        if content_type.starts_with("application/json") {
            let Json(object) = Json::<serde_json::Map<String, serde_json::Value>>::from_request(req, state)
                .await
                .map_err(|e| AppError::Prediction(e.body_text()))?;
            Ok(Self(RawInputs::from_json(object)))
        } else {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::Prediction(e.body_text()))?;
            Ok(Self(RawInputs::from_form(pairs)))
        }
    }
}

/// Classify one submitted feature set. A missing model wins over any body
/// rejection.
pub async fn predict(
    State(state): State<AppState>,
    submission: Result<FeatureSubmission, AppError>,
) -> AppResult<Json<PredictResponse>> {
    state.service.require_model()?;
    let FeatureSubmission(raw) = submission?;

    let result = state.service.classify(&raw)?;

    Ok(Json(PredictResponse {
        prediction: result.prediction,
        confidence: result.confidence_label(),
        input_features: result.input_features,
    }))
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::{Request, StatusCode}, response::Response, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::test_support::{app_with_model, app_without_model, body_json};

    const SAMPLE: &str = "mean+radius=12.5&mean+texture=18.0&mean+perimeter=81.0&mean+area=476.0&mean+smoothness=0.088";

    async fn post_form(app: Router, body: &str) -> Response {
        app.oneshot(
            Request::post("/predict")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn post_json(app: Router, body: Value) -> Response {
        app.oneshot(
            Request::post("/predict")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    fn assert_confidence_format(value: &Value) {
        let confidence = value.as_str().unwrap();
        let (_, decimals) = confidence.split_once('.').unwrap();
        assert_eq!(decimals.len(), 2, "{}", confidence);
        let parsed: f64 = confidence.parse().unwrap();
        assert!((0.0..=100.0).contains(&parsed));
    }

    #[tokio::test]
    async fn test_predict_form_sample() {
        let response = post_form(app_with_model(), SAMPLE).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["prediction"], "Benign");
        assert_confidence_format(&body["confidence"]);
        assert_eq!(
            body["input_features"],
            json!({
                "mean radius": 12.5,
                "mean texture": 18.0,
                "mean perimeter": 81.0,
                "mean area": 476.0,
                "mean smoothness": 0.088
            })
        );
    }

    #[tokio::test]
    async fn test_predict_malignant_sample() {
        let body = "mean+radius=20&mean+texture=25&mean+perimeter=130&mean+area=1200&mean+smoothness=0.12";
        let response = post_form(app_with_model(), body).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["prediction"], "Malignant");
        assert_confidence_format(&body["confidence"]);
    }

    #[tokio::test]
    async fn test_predict_missing_field_defaults_to_zero() {
        let response = post_form(app_with_model(), "mean+radius=12.5").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["input_features"]["mean radius"], 12.5);
        assert_eq!(body["input_features"]["mean area"], 0.0);
        assert_eq!(body["input_features"]["mean smoothness"], 0.0);
    }

    #[tokio::test]
    async fn test_predict_non_numeric_is_400() {
        let body = SAMPLE.replace("mean+texture=18.0", "mean+texture=abc");
        let response = post_form(app_with_model(), &body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Error making prediction: could not convert value of 'mean texture' to float: 'abc'"})
        );
    }

    #[tokio::test]
    async fn test_predict_without_model_is_500() {
        let response = post_form(app_without_model(), SAMPLE).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Model not loaded. Please ensure breast_cancer_model.json exists in the model directory."})
        );
    }

    #[tokio::test]
    async fn test_predict_json_body() {
        let response = post_json(
            app_with_model(),
            json!({
                "mean radius": 12.5,
                "mean texture": "18.0",
                "mean perimeter": 81,
                "mean area": 476.0,
                "mean smoothness": 0.088
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["prediction"], "Benign");
    }

    #[tokio::test]
    async fn test_predict_json_wrong_type_is_400() {
        let response = post_json(app_with_model(), json!({"mean radius": [1, 2]})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Error making prediction: "));
    }

    #[tokio::test]
    async fn test_predict_malformed_json_is_400() {
        let response = app_with_model()
            .oneshot(
                Request::post("/predict")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Error making prediction: "));
    }

    #[tokio::test]
    async fn test_predict_without_model_ignores_body_format() {
        for content_type in [None, Some("text/plain")] {
            let mut request = Request::post("/predict");
            if let Some(content_type) = content_type {
                request = request.header("content-type", content_type);
            }
            let response = app_without_model()
                .oneshot(request.body(Body::from("not a form")).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{:?}", content_type);
            assert_eq!(
                body_json(response).await,
                json!({"error": "Model not loaded. Please ensure breast_cancer_model.json exists in the model directory."})
            );
        }
    }

    #[tokio::test]
    async fn test_predict_bare_post_defaults_every_feature() {
        let response = app_with_model()
            .oneshot(Request::post("/predict").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["input_features"],
            json!({
                "mean radius": 0.0,
                "mean texture": 0.0,
                "mean perimeter": 0.0,
                "mean area": 0.0,
                "mean smoothness": 0.0
            })
        );
    }

    #[tokio::test]
    async fn test_predict_body_without_content_type_is_400() {
        let response = app_with_model()
            .oneshot(Request::post("/predict").body(Body::from("mean+radius=1")).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Error making prediction: "));
    }

    #[tokio::test]
    async fn test_predict_is_idempotent() {
        let first = body_json(post_form(app_with_model(), SAMPLE).await).await;
        let second = body_json(post_form(app_with_model(), SAMPLE).await).await;
        assert_eq!(first, second);
    }
}
