use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/host-teams", host_team_routes())
        .nest("/participant-teams", participant_team_routes())
        .nest("/challenges", challenge_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn host_team_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::team::create_host_team,
            handlers::team::list_host_teams
        ))
        .routes(routes!(handlers::team::add_host_team_member))
        .nest("/{team_pk}/challenges", team_challenge_routes())
}

fn team_challenge_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::challenge::create_challenge,
            handlers::challenge::list_team_challenges
        ))
        .routes(routes!(
            handlers::challenge::get_team_challenge,
            handlers::challenge::update_challenge,
            handlers::challenge::delete_challenge
        ))
}

fn participant_team_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::team::create_participant_team,
            handlers::team::list_participant_teams
        ))
        .routes(routes!(handlers::team::add_participant_team_member))
}

fn challenge_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::challenge::list_challenges_by_team))
        .routes(routes!(handlers::import::import_challenge_handler))
        .routes(routes!(handlers::challenge::list_challenges_by_time))
        .routes(routes!(handlers::challenge::get_challenge))
        .routes(routes!(handlers::challenge::disable_challenge))
        .routes(routes!(handlers::challenge::join_challenge))
        .nest("/{pk}/phases", phase_routes())
        .nest("/{pk}/phase-splits", phase_split_routes())
        .nest("/{pk}/assets", asset_routes())
}

fn phase_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::phase::create_phase,
            handlers::phase::list_phases
        ))
        .routes(routes!(
            handlers::phase::get_phase,
            handlers::phase::update_phase,
            handlers::phase::delete_phase
        ))
        .routes(routes!(handlers::assets::download_phase_annotation))
}

fn phase_split_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::phase::list_phase_splits))
}

fn asset_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::assets::download_challenge_asset))
}
