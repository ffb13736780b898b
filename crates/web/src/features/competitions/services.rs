use storage::{
    Store,
    dto::competition::{AddRefereeRequest, CreateCompetitionRequest, RefereeResponse},
    error::Result,
    models::{Competition, NewCompetition, Role},
};

pub async fn list_competitions(store: &dyn Store) -> Result<Vec<Competition>> {
    store.list_competitions().await
}

pub async fn get_competition(store: &dyn Store, competition_id: i32) -> Result<Competition> {
    store.get_competition(competition_id).await
}

/// Creates the competition and makes its creator an admin of it.
pub async fn create_competition(
    store: &dyn Store,
    creator_id: i32,
    request: CreateCompetitionRequest,
) -> Result<Competition> {
    let competition = store
        .create_competition(&NewCompetition::from(request))
        .await?;
    store
        .grant_role(creator_id, &Role::Admin(competition.competition_id))
        .await?;

    tracing::info!(
        competition_id = competition.competition_id,
        creator_id,
        "Competition created"
    );
    Ok(competition)
}

/// Grants the referee role to an existing user, found by email.
pub async fn add_referee(
    store: &dyn Store,
    competition_id: i32,
    request: &AddRefereeRequest,
) -> Result<RefereeResponse> {
    store.get_competition(competition_id).await?;
    let user = store.find_user_by_email(request.email.trim()).await?;
    let roles = store
        .grant_role(user.user_id, &Role::Referee(competition_id))
        .await?;

    tracing::info!(competition_id, user_id = user.user_id, "Referee added");
    Ok(RefereeResponse {
        user_id: user.user_id,
        email: user.email,
        roles: roles.to_strings(),
    })
}
