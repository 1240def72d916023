use serde_json::json;

use crate::common::{TestApp, routes};

mod create {
    use super::*;

    #[tokio::test]
    async fn phases_are_positioned_in_insertion_order() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app.create_challenge(&token, team_id, "Staged", true).await;

        app.create_phase(&token, pk, "Dev Phase", true).await;
        app.create_phase(&token, pk, "Test Phase", true).await;

        let res = app.get_with_token(&routes::phases(pk), &token).await;
        assert_eq!(res.status, 200);
        let phases = res.body.as_array().unwrap();
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0]["name"], "Dev Phase");
        assert_eq!(phases[0]["position"], 0);
        assert_eq!(phases[1]["name"], "Test Phase");
        assert_eq!(phases[1]["position"], 1);
    }

    #[tokio::test]
    async fn only_hosts_can_create_phases() {
        let app = TestApp::spawn().await;
        let host = app.create_authenticated_user("hosta", "securepass").await;
        let outsider = app.create_authenticated_user("mallory", "securepass").await;
        let team_id = app.create_host_team(&host, "Vision Lab").await;
        let pk = app.create_challenge(&host, team_id, "Staged", true).await;

        let res = app
            .post_with_token(
                &routes::phases(pk),
                &json!({
                    "name": "Sneaky Phase",
                    "description": "d",
                    "start_date": "2020-01-01T00:00:00Z",
                    "end_date": "2099-01-01T00:00:00Z",
                }),
                &outsider,
            )
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn inverted_dates_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app.create_challenge(&token, team_id, "Staged", true).await;

        let res = app
            .post_with_token(
                &routes::phases(pk),
                &json!({
                    "name": "Backwards",
                    "description": "d",
                    "start_date": "2099-01-01T00:00:00Z",
                    "end_date": "2020-01-01T00:00:00Z",
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod visibility {
    use super::*;

    #[tokio::test]
    async fn anonymous_callers_only_see_public_phases() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app.create_challenge(&token, team_id, "Staged", true).await;

        app.create_phase(&token, pk, "Public Phase", true).await;
        app.create_phase(&token, pk, "Hidden Phase", false).await;

        let res = app.get_without_token(&routes::phases(pk)).await;
        assert_eq!(res.status, 200);
        let phases = res.body.as_array().unwrap();
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0]["name"], "Public Phase");
    }

    #[tokio::test]
    async fn hosts_see_every_phase() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app.create_challenge(&token, team_id, "Staged", true).await;

        app.create_phase(&token, pk, "Public Phase", true).await;
        app.create_phase(&token, pk, "Hidden Phase", false).await;

        let res = app.get_with_token(&routes::phases(pk), &token).await;
        assert_eq!(res.body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn non_public_phase_is_not_found_for_non_hosts() {
        let app = TestApp::spawn().await;
        let host = app.create_authenticated_user("hosta", "securepass").await;
        let other = app.create_authenticated_user("lurker", "securepass").await;
        let team_id = app.create_host_team(&host, "Vision Lab").await;
        let pk = app.create_challenge(&host, team_id, "Staged", true).await;
        let phase_pk = app.create_phase(&host, pk, "Hidden Phase", false).await;

        let res = app
            .get_with_token(&routes::phase(pk, phase_pk), &other)
            .await;
        assert_eq!(res.status, 404);

        let res = app.get_with_token(&routes::phase(pk, phase_pk), &host).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Hidden Phase");
    }

    #[tokio::test]
    async fn phase_of_another_challenge_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk_a = app.create_challenge(&token, team_id, "First", true).await;
        let pk_b = app.create_challenge(&token, team_id, "Second", true).await;
        let phase_pk = app.create_phase(&token, pk_a, "Dev Phase", true).await;

        let res = app
            .get_with_token(&routes::phase(pk_b, phase_pk), &token)
            .await;
        assert_eq!(res.status, 404);
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn patch_updates_only_the_given_fields() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app.create_challenge(&token, team_id, "Staged", true).await;
        let phase_pk = app.create_phase(&token, pk, "Dev Phase", false).await;

        let res = app
            .patch_with_token(
                &routes::phase(pk, phase_pk),
                &json!({"is_public": true}),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["is_public"], true);
        assert_eq!(res.body["name"], "Dev Phase");
    }

    #[tokio::test]
    async fn empty_patch_returns_the_resource_unchanged() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app.create_challenge(&token, team_id, "Staged", true).await;
        let phase_pk = app.create_phase(&token, pk, "Dev Phase", true).await;

        let res = app
            .patch_with_token(&routes::phase(pk, phase_pk), &json!({}), &token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Dev Phase");
    }

    #[tokio::test]
    async fn patch_validates_dates_against_existing_values() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app.create_challenge(&token, team_id, "Staged", true).await;
        let phase_pk = app.create_phase(&token, pk, "Dev Phase", true).await;

        let res = app
            .patch_with_token(
                &routes::phase(pk, phase_pk),
                &json!({"end_date": "2019-01-01T00:00:00Z"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn delete_removes_the_phase() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app.create_challenge(&token, team_id, "Staged", true).await;
        let phase_pk = app.create_phase(&token, pk, "Dev Phase", true).await;

        let res = app
            .delete_with_token(&routes::phase(pk, phase_pk), &token)
            .await;
        assert_eq!(res.status, 204);

        let res = app.get_with_token(&routes::phase(pk, phase_pk), &token).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn only_hosts_can_delete() {
        let app = TestApp::spawn().await;
        let host = app.create_authenticated_user("hosta", "securepass").await;
        let outsider = app.create_authenticated_user("mallory", "securepass").await;
        let team_id = app.create_host_team(&host, "Vision Lab").await;
        let pk = app.create_challenge(&host, team_id, "Staged", true).await;
        let phase_pk = app.create_phase(&host, pk, "Dev Phase", true).await;

        let res = app
            .delete_with_token(&routes::phase(pk, phase_pk), &outsider)
            .await;
        assert_eq!(res.status, 403);
    }
}

mod phase_splits {
    use super::*;

    #[tokio::test]
    async fn challenge_without_phases_has_no_splits() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app.create_challenge(&token, team_id, "Bare", true).await;

        let res = app.get_without_token(&routes::phase_splits(pk)).await;
        assert_eq!(res.status, 200);
        assert!(res.body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_challenge_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::phase_splits(99999)).await;
        assert_eq!(res.status, 404);
    }
}
