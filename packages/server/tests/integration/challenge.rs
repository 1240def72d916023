use serde_json::json;

use crate::common::{TestApp, routes};

mod crud {
    use super::*;

    #[tokio::test]
    async fn team_member_can_create_and_fetch_a_challenge() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;

        let pk = app
            .create_challenge(&token, team_id, "VQA Benchmark", true)
            .await;

        let res = app
            .get_with_token(&routes::team_challenge(team_id, pk), &token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "VQA Benchmark");
        assert_eq!(res.body["creator_team_id"], team_id);
        assert_eq!(res.body["is_disabled"], false);
    }

    #[tokio::test]
    async fn non_member_cannot_create_a_challenge() {
        let app = TestApp::spawn().await;
        let host = app.create_authenticated_user("hosta", "securepass").await;
        let outsider = app.create_authenticated_user("mallory", "securepass").await;
        let team_id = app.create_host_team(&host, "Vision Lab").await;

        let res = app
            .post_with_token(
                &routes::team_challenges(team_id),
                &json!({
                    "title": "Sneaky",
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

        let res = app
            .post_with_token(
                &routes::team_challenges(team_id),
                &json!({
                    "title": "Backwards",
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

    #[tokio::test]
    async fn patch_updates_only_the_given_fields() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app
            .create_challenge(&token, team_id, "Old Title", false)
            .await;

        let res = app
            .patch_with_token(
                &routes::team_challenge(team_id, pk),
                &json!({"title": "New Title", "published": true}),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "New Title");
        assert_eq!(res.body["published"], true);
        assert_eq!(res.body["description"], "Benchmark description");
    }

    #[tokio::test]
    async fn empty_patch_returns_the_resource_unchanged() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app
            .create_challenge(&token, team_id, "Unchanged", true)
            .await;

        let res = app
            .patch_with_token(&routes::team_challenge(team_id, pk), &json!({}), &token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Unchanged");
    }

    #[tokio::test]
    async fn patch_validates_dates_against_existing_values() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app
            .create_challenge(&token, team_id, "Dated", true)
            .await;

        // end_date before the existing start_date
        let res = app
            .patch_with_token(
                &routes::team_challenge(team_id, pk),
                &json!({"end_date": "2019-01-01T00:00:00Z"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn delete_removes_the_challenge() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app
            .create_challenge(&token, team_id, "Short Lived", true)
            .await;

        let res = app
            .delete_with_token(&routes::team_challenge(team_id, pk), &token)
            .await;
        assert_eq!(res.status, 204);

        let res = app
            .get_with_token(&routes::team_challenge(team_id, pk), &token)
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn challenge_of_another_team_is_not_found() {
        let app = TestApp::spawn().await;
        let a = app.create_authenticated_user("hosta", "securepass").await;
        let b = app.create_authenticated_user("hostb", "securepass").await;
        let team_a = app.create_host_team(&a, "Lab A").await;
        let team_b = app.create_host_team(&b, "Lab B").await;
        let pk = app.create_challenge(&a, team_a, "A's Challenge", true).await;

        let res = app
            .get_with_token(&routes::team_challenge(team_b, pk), &b)
            .await;
        assert_eq!(res.status, 404);
    }
}

mod public_lookup {
    use super::*;

    #[tokio::test]
    async fn anyone_can_fetch_a_challenge_by_id() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app.create_challenge(&token, team_id, "Open", true).await;

        let res = app.get_without_token(&routes::challenge(pk)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Open");
    }

    #[tokio::test]
    async fn disabled_challenges_are_hidden() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        let pk = app.create_challenge(&token, team_id, "Doomed", true).await;

        let res = app
            .post_with_token(&routes::challenge_disable(pk), &json!({}), &token)
            .await;
        assert_eq!(res.status, 204, "{}", res.text);

        let res = app.get_without_token(&routes::challenge(pk)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn only_hosts_can_disable() {
        let app = TestApp::spawn().await;
        let host = app.create_authenticated_user("hosta", "securepass").await;
        let outsider = app.create_authenticated_user("mallory", "securepass").await;
        let team_id = app.create_host_team(&host, "Vision Lab").await;
        let pk = app.create_challenge(&host, team_id, "Guarded", true).await;

        let res = app
            .post_with_token(&routes::challenge_disable(pk), &json!({}), &outsider)
            .await;
        assert_eq!(res.status, 403);
    }
}

mod time_filter {
    use super::*;

    async fn seed_challenges(app: &TestApp) -> (String, i32) {
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;

        let mk = |title: &str, start: &str, end: &str| {
            json!({
                "title": title,
                "description": "d",
                "start_date": start,
                "end_date": end,
                "published": true,
            })
        };

        for (title, start, end) in [
            ("Past", "2019-01-01T00:00:00Z", "2019-06-01T00:00:00Z"),
            ("Present", "2020-01-01T00:00:00Z", "2099-01-01T00:00:00Z"),
            ("Future", "2098-01-01T00:00:00Z", "2099-01-01T00:00:00Z"),
        ] {
            let res = app
                .post_with_token(&routes::team_challenges(team_id), &mk(title, start, end), &token)
                .await;
            assert_eq!(res.status, 201, "{}", res.text);
        }

        // An unpublished one that must never show up.
        let res = app
            .post_with_token(
                &routes::team_challenges(team_id),
                &mk("Draft", "2020-01-01T00:00:00Z", "2099-01-01T00:00:00Z"),
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
        let draft_pk = res.id();
        let res = app
            .patch_with_token(
                &routes::team_challenge(team_id, draft_pk),
                &json!({"published": false}),
                &token,
            )
            .await;
        assert_eq!(res.status, 200);

        (token, team_id)
    }

    fn titles(body: &serde_json::Value) -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["title"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn each_window_returns_the_matching_challenges() {
        let app = TestApp::spawn().await;
        seed_challenges(&app).await;

        let res = app
            .get_without_token(&routes::challenges_by_time("past"))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(titles(&res.body), vec!["Past"]);

        let res = app
            .get_without_token(&routes::challenges_by_time("present"))
            .await;
        assert_eq!(titles(&res.body), vec!["Present"]);

        let res = app
            .get_without_token(&routes::challenges_by_time("future"))
            .await;
        assert_eq!(titles(&res.body), vec!["Future"]);

        let res = app
            .get_without_token(&routes::challenges_by_time("all"))
            .await;
        assert_eq!(res.body["data"].as_array().unwrap().len(), 3);
        assert_eq!(res.body["pagination"]["total"], 3);
    }

    #[tokio::test]
    async fn unknown_window_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&routes::challenges_by_time("yesterday"))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn disabled_challenges_drop_out_of_listings() {
        let app = TestApp::spawn().await;
        let (token, team_id) = seed_challenges(&app).await;

        let res = app
            .get_with_token(&routes::team_challenges(team_id), &token)
            .await;
        let present_pk = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["title"] == "Present")
            .unwrap()["id"]
            .as_i64()
            .unwrap() as i32;

        let res = app
            .post_with_token(&routes::challenge_disable(present_pk), &json!({}), &token)
            .await;
        assert_eq!(res.status, 204);

        let res = app
            .get_without_token(&routes::challenges_by_time("present"))
            .await;
        assert!(titles(&res.body).is_empty());
    }
}

mod team_filter {
    use super::*;

    #[tokio::test]
    async fn exactly_one_filter_must_be_given() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;

        let res = app.get_with_token(routes::CHALLENGES, &token).await;
        assert_eq!(res.status, 400);

        let res = app
            .get_with_token(
                &format!("{}?host_team=1&mode=host", routes::CHALLENGES),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn host_team_filter_returns_the_teams_challenges() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("hosta", "securepass").await;
        let team_id = app.create_host_team(&token, "Vision Lab").await;
        app.create_challenge(&token, team_id, "Mine", true).await;

        let res = app
            .get_with_token(
                &format!("{}?host_team={team_id}", routes::CHALLENGES),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        let list = res.body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["title"], "Mine");
    }

    #[tokio::test]
    async fn host_team_filter_requires_membership() {
        let app = TestApp::spawn().await;
        let host = app.create_authenticated_user("hosta", "securepass").await;
        let outsider = app.create_authenticated_user("mallory", "securepass").await;
        let team_id = app.create_host_team(&host, "Vision Lab").await;

        let res = app
            .get_with_token(
                &format!("{}?host_team={team_id}", routes::CHALLENGES),
                &outsider,
            )
            .await;
        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn participant_mode_lists_joined_challenges() {
        let app = TestApp::spawn().await;
        let host = app.create_authenticated_user("hosta", "securepass").await;
        let racer = app.create_authenticated_user("racer", "securepass").await;
        let host_team = app.create_host_team(&host, "Vision Lab").await;
        let pk = app.create_challenge(&host, host_team, "Joinable", true).await;
        let p_team = app.create_participant_team(&racer, "Team Rocket").await;

        let res = app
            .post_with_token(&routes::challenge_join(pk, p_team), &json!({}), &racer)
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let res = app
            .get_with_token(&format!("{}?mode=participant", routes::CHALLENGES), &racer)
            .await;
        assert_eq!(res.status, 200);
        let list = res.body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["title"], "Joinable");
    }
}

mod join {
    use super::*;

    #[tokio::test]
    async fn rejoining_with_the_same_team_is_a_no_op() {
        let app = TestApp::spawn().await;
        let host = app.create_authenticated_user("hosta", "securepass").await;
        let racer = app.create_authenticated_user("racer", "securepass").await;
        let host_team = app.create_host_team(&host, "Vision Lab").await;
        let pk = app.create_challenge(&host, host_team, "Joinable", true).await;
        let p_team = app.create_participant_team(&racer, "Team Rocket").await;

        let first = app
            .post_with_token(&routes::challenge_join(pk, p_team), &json!({}), &racer)
            .await;
        assert_eq!(first.status, 201);

        let again = app
            .post_with_token(&routes::challenge_join(pk, p_team), &json!({}), &racer)
            .await;
        assert_eq!(again.status, 200);
    }

    #[tokio::test]
    async fn hosts_cannot_join_their_own_challenge() {
        let app = TestApp::spawn().await;
        let host = app.create_authenticated_user("hosta", "securepass").await;
        let host_team = app.create_host_team(&host, "Vision Lab").await;
        let pk = app.create_challenge(&host, host_team, "Own Goal", true).await;
        let p_team = app.create_participant_team(&host, "Own Racers").await;

        let res = app
            .post_with_token(&routes::challenge_join(pk, p_team), &json!({}), &host)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn members_cannot_participate_twice_via_different_teams() {
        let app = TestApp::spawn().await;
        let host = app.create_authenticated_user("hosta", "securepass").await;
        let racer = app.create_authenticated_user("racer", "securepass").await;
        let host_team = app.create_host_team(&host, "Vision Lab").await;
        let pk = app.create_challenge(&host, host_team, "Joinable", true).await;

        let team_one = app.create_participant_team(&racer, "First Team").await;
        let team_two = app.create_participant_team(&racer, "Second Team").await;

        let res = app
            .post_with_token(&routes::challenge_join(pk, team_one), &json!({}), &racer)
            .await;
        assert_eq!(res.status, 201);

        let res = app
            .post_with_token(&routes::challenge_join(pk, team_two), &json!({}), &racer)
            .await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn unpublished_challenges_cannot_be_joined() {
        let app = TestApp::spawn().await;
        let host = app.create_authenticated_user("hosta", "securepass").await;
        let racer = app.create_authenticated_user("racer", "securepass").await;
        let host_team = app.create_host_team(&host, "Vision Lab").await;
        let pk = app.create_challenge(&host, host_team, "Draft", false).await;
        let p_team = app.create_participant_team(&racer, "Team Rocket").await;

        let res = app
            .post_with_token(&routes::challenge_join(pk, p_team), &json!({}), &racer)
            .await;
        assert_eq!(res.status, 404);
    }
}
