use crate::controller::Studio;
use crate::error::TransitionError;
use crate::models::BusinessField;
use crate::preview::SocialPlatform;
use crate::websocket;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use warp::http::{StatusCode, Uri};
use warp::reply::Response;
use warp::{Filter, Reply};

#[derive(Debug, Deserialize)]
pub struct FieldEdit {
    field: String,
    value: String,
}

pub async fn start_server(studio: Studio, addr: SocketAddr) {
    log::info!("Starting server at http://{}", addr);
    warp::serve(routes(studio)).run(addr).await;
}

pub fn routes(
    studio: Studio,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let with_studio = {
        let studio = studio.clone();
        warp::any().map(move || studio.clone())
    };

    let health_route = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| "Server is running");

    let index = warp::path::end()
        .and(warp::get())
        .and(with_studio.clone())
        .map(|studio: Studio| warp::reply::html(studio.render()));

    let generate = warp::path("generate")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::form::<HashMap<String, String>>())
        .and(with_studio.clone())
        .map(generate);

    let reset = warp::path("reset")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_studio.clone())
        .map(|studio: Studio| match studio.reset() {
            Ok(()) => back_to_index(),
            Err(e) => conflict(e),
        });

    let upload = warp::path!("upload" / String)
        .and(warp::post())
        .map(|platform: String| match platform.parse::<SocialPlatform>() {
            Ok(platform) => platform.simulate_upload().into_response(),
            Err(e) => warp::reply::with_status(e, StatusCode::NOT_FOUND).into_response(),
        });

    let state = warp::path!("api" / "state")
        .and(warp::get())
        .and(with_studio.clone())
        .map(|studio: Studio| warp::reply::json(&studio.snapshot()));

    let edit = warp::path!("api" / "form")
        .and(warp::patch())
        .and(warp::body::json::<FieldEdit>())
        .and(with_studio)
        .map(edit_field);

    index
        .or(health_route)
        .or(generate)
        .or(reset)
        .or(upload)
        .or(state)
        .or(edit)
        .or(websocket::events_route(studio))
}

fn generate(fields: HashMap<String, String>, studio: Studio) -> Response {
    let pairs = fields.iter().map(|(k, v)| (k.as_str(), v.as_str()));
    match studio.submit_form(pairs) {
        // The task finishes the transition on its own.
        Ok(_task) => back_to_index(),
        Err(TransitionError::Form(problem)) => {
            log::info!("Form rejected: {}", problem);
            warp::reply::with_status(
                warp::reply::html(studio.render_with(Some(&problem))),
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .into_response()
        }
        Err(e) => conflict(e),
    }
}

fn edit_field(edit: FieldEdit, studio: Studio) -> Response {
    let field = match edit.field.parse::<BusinessField>() {
        Ok(field) => field,
        Err(e) => return warp::reply::with_status(e, StatusCode::BAD_REQUEST).into_response(),
    };
    match studio.edit_field(field, &edit.value) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => conflict(e),
    }
}

fn back_to_index() -> Response {
    warp::redirect::see_other(Uri::from_static("/")).into_response()
}

fn conflict(error: TransitionError) -> Response {
    log::warn!("{}", error);
    warp::reply::with_status(error.to_string(), StatusCode::CONFLICT).into_response()
}
