use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::envelope::{Deleted, Envelope};
use super::error::ApiError;
use super::AppState;
use crate::articles::{self, ArticlePage, CreateArticle, ListParams, UpdateArticle};
use crate::storage::Article;

type ApiResult<T> = Result<T, ApiError>;

pub async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<CreateArticle>, JsonRejection>,
) -> ApiResult<(StatusCode, Envelope<Article>)> {
    let Json(payload) = payload?;
    let article = articles::create_article(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Envelope::ok(article)))
}

pub async fn list_articles(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Envelope<ArticlePage>> {
    let Query(params) = params?;
    let page = articles::list_articles(&state.db, params).await?;
    Ok(Envelope::ok(page))
}

pub async fn get_article(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Envelope<Article>> {
    let Path(id) = id?;
    let article = articles::get_article(&state.db, id).await?;
    Ok(Envelope::ok(article))
}

pub async fn update_article(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateArticle>, JsonRejection>,
) -> ApiResult<Envelope<Article>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let article = articles::update_article(&state.db, id, payload).await?;
    Ok(Envelope::ok(article))
}

pub async fn delete_article(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Envelope<Deleted>> {
    let Path(id) = id?;
    articles::delete_article(&state.db, id).await?;
    Ok(Envelope::ok(Deleted::new(id)))
}

pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
