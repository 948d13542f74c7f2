//! Handlers for the stitcher page.

use super::{ApiError, AppState};
use crate::{
    core::{
        document::LoadedDocument,
        messages::MessageLog,
        request::{ParameterBag, RequestParams},
        stitcher::{DocumentStitcher, StitchOutcome},
    },
    entities::document_status,
};
use axum::{
    Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tracing::{info, instrument};

/// Page data returned when the request does not end in a redirect
#[derive(Debug, Serialize)]
pub struct StitcherPage {
    /// Page title key
    pub title: &'static str,
    /// How the request ended
    pub outcome: &'static str,
    /// Selected model name
    pub model_name: String,
    /// Selected codes as submitted
    pub codes: Vec<String>,
    /// Accepted documents, oldest first
    pub documents: Vec<LoadedDocument>,
    /// Statuses the documents can be merged into
    pub statuses: Vec<document_status::Model>,
    /// Fresh token for the next submission
    pub multireqtoken: String,
    /// Messages for the user
    pub messages: MessageLog,
}

/// GET /health
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /document-stitcher?codes=..&model=..
#[instrument(skip_all)]
pub async fn show_stitcher(
    State(state): State<AppState>,
    Query(query): Query<ParameterBag>,
) -> Result<Json<StitcherPage>, ApiError> {
    let params = RequestParams::new(query, ParameterBag::default());
    let mut stitcher = DocumentStitcher::new(
        &state.database,
        state.tokens.as_ref(),
        state.generator.as_ref(),
    );
    let outcome = stitcher.run(&params).await?;
    Ok(Json(page(&state, stitcher, &outcome).await?))
}

/// POST /document-stitcher
///
/// Redirects (303) to the first generated document, otherwise answers with the page data.
#[instrument(skip_all)]
pub async fn stitch_documents(
    State(state): State<AppState>,
    Query(query): Query<ParameterBag>,
    Form(body): Form<ParameterBag>,
) -> Result<Response, ApiError> {
    let params = RequestParams::new(query, body);
    let mut stitcher = DocumentStitcher::new(
        &state.database,
        state.tokens.as_ref(),
        state.generator.as_ref(),
    );
    let outcome = stitcher.run(&params).await?;

    if let StitchOutcome::Generated {
        redirect: Some(location),
        ..
    } = &outcome
    {
        info!("Redirecting to {}", location);
        return Ok(Redirect::to(location).into_response());
    }

    Ok(Json(page(&state, stitcher, &outcome).await?).into_response())
}

async fn page(
    state: &AppState,
    stitcher: DocumentStitcher<'_>,
    outcome: &StitchOutcome,
) -> Result<StitcherPage, ApiError> {
    let statuses = stitcher.available_statuses().await?;
    Ok(StitcherPage {
        title: "group-or-split",
        outcome: outcome_label(outcome),
        model_name: stitcher.model_name,
        codes: stitcher.codes,
        documents: stitcher.documents,
        statuses,
        multireqtoken: state.tokens.new_token(),
        messages: stitcher.log,
    })
}

const fn outcome_label(outcome: &StitchOutcome) -> &'static str {
    match outcome {
        StitchOutcome::Viewed => "viewed",
        StitchOutcome::Duplicate => "duplicate",
        StitchOutcome::NothingToMerge => "nothing-to-merge",
        StitchOutcome::GenerationFailed => "generation-failed",
        StitchOutcome::Generated { .. } => "generated",
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::{
        core::{
            generator::BusinessDocumentGenerator, kind::DocumentKind, token::InMemoryTokenStore,
        },
        entities::Document,
        errors::Result,
        test_utils::*,
        web::{AppState, create_router},
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use sea_orm::{DatabaseConnection, EntityTrait};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(db: &DatabaseConnection) -> AppState {
        AppState::new(
            db.clone(),
            Arc::new(InMemoryTokenStore::new()),
            Arc::new(BusinessDocumentGenerator),
        )
    }

    fn post(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/document-stitcher")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() -> Result<()> {
        let db = setup_test_db().await?;
        let response = create_router(state(&db))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
        Ok(())
    }

    #[tokio::test]
    async fn test_view_lists_documents_and_statuses() -> Result<()> {
        let db = setup_test_db().await?;
        seed_order_workflow(&db).await?;
        let a = create_test_document(&db, DocumentKind::CustomerOrder, "A").await?;
        create_test_line(&db, a.id, 5.0, 0.0).await?;

        let response = create_router(state(&db))
            .oneshot(
                Request::get("/document-stitcher?codes=A,missing&model=CustomerOrder")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = json_body(response).await;
        assert_eq!(page["outcome"], "viewed");
        assert_eq!(page["model_name"], "CustomerOrder");
        assert_eq!(page["documents"].as_array().unwrap().len(), 1);
        assert_eq!(page["documents"][0]["header"]["code"], "A");
        assert_eq!(page["statuses"].as_array().unwrap().len(), 1);
        assert_eq!(page["statuses"][0]["id"], 2);
        assert_eq!(page["multireqtoken"].as_str().unwrap().len(), 32);
        Ok(())
    }

    #[tokio::test]
    async fn test_post_redirects_to_generated_document() -> Result<()> {
        let db = setup_test_db().await?;
        seed_order_workflow(&db).await?;
        let a = create_test_document(&db, DocumentKind::CustomerOrder, "A").await?;
        let line = create_test_line(&db, a.id, 5.0, 0.0).await?;

        let body = format!(
            "code%5B%5D=A&model=CustomerOrder&status=2&multireqtoken=t1&approve_quant_{}=5",
            line.id
        );
        let app = create_router(state(&db));
        let response = app.clone().oneshot(post(body.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("EditCustomerDeliveryNote?code=DC"));

        // Same token again: no redirect, nothing new generated
        let documents_before = Document::find().all(&db).await?.len();
        let response = app.oneshot(post(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = json_body(response).await;
        assert_eq!(page["outcome"], "duplicate");
        assert_eq!(page["messages"][0]["key"], "duplicated-request");
        assert_eq!(Document::find().all(&db).await?.len(), documents_before);
        Ok(())
    }

    #[tokio::test]
    async fn test_post_incompatible_documents_reports_warning() -> Result<()> {
        let db = setup_test_db().await?;
        seed_order_workflow(&db).await?;
        let a = create_test_document(&db, DocumentKind::CustomerOrder, "A").await?;
        create_test_line(&db, a.id, 5.0, 0.0).await?;
        create_custom_document(
            &db,
            DocumentKind::CustomerOrder,
            "B",
            "USD",
            "CUST1",
            a.date,
            a.time,
        )
        .await?;

        let response = create_router(state(&db))
            .oneshot(post(
                "code%5B%5D=A&code%5B%5D=B&model=CustomerOrder".to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = json_body(response).await;
        assert_eq!(page["documents"].as_array().unwrap().len(), 1);
        assert_eq!(page["messages"][0]["key"], "incompatible-document");
        assert_eq!(page["messages"][0]["context"]["%code%"], "B");
        Ok(())
    }
}
