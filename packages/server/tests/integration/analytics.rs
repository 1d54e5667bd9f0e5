use serde_json::json;

use crate::common::{TestApp, routes};

/// Two students over two days: the first attends once, the second twice.
async fn two_day_class(app: &TestApp) -> Vec<i32> {
    let ids = app.create_class("CO321", 2).await;
    app.record(ids[0], "CO321", "2024-01-01", true).await;
    app.record(ids[0], "CO321", "2024-01-02", false).await;
    app.record(ids[1], "CO321", "2024-01-01", true).await;
    app.record(ids[1], "CO321", "2024-01-02", true).await;
    ids
}

mod subject_metrics {
    use super::*;

    #[tokio::test]
    async fn computes_every_aggregate_from_one_snapshot() {
        let app = TestApp::spawn().await;
        let ids = two_day_class(&app).await;
        let token = app.login().await;

        let res = app
            .get_with_token(&routes::analytics("CO321"), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], true);
        let data = &res.body["data"];

        assert_eq!(
            data["overallStats"],
            json!({
                "totalStudents": 2,
                "classesHeld": 2,
                "averageAttendance": "75.00",
                "defaultersCount": 1,
            })
        );
        assert_eq!(
            data["attendanceTrends"],
            json!([
                {"date": "2024-01-01", "percentage": "100.00"},
                {"date": "2024-01-02", "percentage": "50.00"},
            ])
        );

        let top = data["topPerformers"].as_array().unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0]["studentId"], ids[1]);
        assert_eq!(top[0]["percentage"], "100.00");
        assert_eq!(top[0]["status"], "good");
        assert_eq!(top[1]["studentId"], ids[0]);

        let defaulters = data["defaulters"].as_array().unwrap();
        assert_eq!(defaulters.len(), 1);
        assert_eq!(defaulters[0]["studentId"], ids[0]);
        assert_eq!(defaulters[0]["percentage"], "50.00");
        assert_eq!(defaulters[0]["status"], "critical");
        assert_eq!(defaulters[0]["name"], "Student 1");

        assert_eq!(
            data["attendanceDistribution"],
            json!([
                {"range": "90-100", "count": 1},
                {"range": "<60", "count": 1},
            ])
        );
        assert_eq!(
            data["weeklyTrends"],
            json!([{"year": 2024, "week": 1, "present": 3, "absent": 1}])
        );
    }

    #[tokio::test]
    async fn subject_without_attendance_yields_zeroed_metrics() {
        let app = TestApp::spawn().await;
        app.create_class("CO215", 10).await;
        let token = app.login().await;

        let res = app
            .get_with_token(&routes::analytics("CO215"), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = &res.body["data"];
        assert_eq!(data["overallStats"]["totalStudents"], 10);
        assert_eq!(data["overallStats"]["classesHeld"], 0);
        assert_eq!(data["overallStats"]["averageAttendance"], "0.00");
        assert_eq!(data["overallStats"]["defaultersCount"], 0);
        assert_eq!(data["attendanceTrends"], json!([]));
        assert_eq!(data["topPerformers"], json!([]));
        assert_eq!(data["defaulters"], json!([]));
        assert_eq!(data["attendanceDistribution"], json!([]));
        assert_eq!(data["weeklyTrends"], json!([]));
    }

    #[tokio::test]
    async fn other_subjects_do_not_affect_the_result() {
        let app = TestApp::spawn().await;
        let ids = two_day_class(&app).await;
        app.create_subject("CO215", "Data Structures").await;
        app.enroll(ids[0], "CO215").await;
        app.record(ids[0], "CO215", "2024-01-03", true).await;
        let token = app.login().await;

        let res = app
            .get_with_token(&routes::analytics("CO321"), &token)
            .await;

        assert_eq!(res.body["data"]["overallStats"]["classesHeld"], 2);
        assert_eq!(res.body["data"]["defaulters"][0]["studentId"], ids[0]);
    }
}

mod month_scope {
    use super::*;

    #[tokio::test]
    async fn only_facts_inside_the_month_count() {
        let app = TestApp::spawn().await;
        let ids = two_day_class(&app).await;
        app.record(ids[0], "CO321", "2024-02-01", true).await;
        app.record(ids[1], "CO321", "2024-02-01", false).await;
        let token = app.login().await;

        let res = app
            .get_with_token(&routes::analytics_for_month("CO321", 2, 2024), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let stats = &res.body["data"]["overallStats"];
        assert_eq!(stats["totalStudents"], 2);
        assert_eq!(stats["classesHeld"], 1);
        assert_eq!(stats["averageAttendance"], "50.00");
        assert_eq!(res.body["data"]["defaulters"][0]["studentId"], ids[1]);
    }

    #[tokio::test]
    async fn month_without_year_is_rejected() {
        let app = TestApp::spawn().await;
        app.create_class("CO321", 1).await;
        let token = app.login().await;

        let res = app
            .get_with_token(&format!("{}?month=2", routes::analytics("CO321")), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn out_of_range_month_is_rejected() {
        let app = TestApp::spawn().await;
        app.create_class("CO321", 1).await;
        let token = app.login().await;

        let res = app
            .get_with_token(&routes::analytics_for_month("CO321", 13, 2024), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod errors {
    use super::*;

    #[tokio::test]
    async fn unknown_subject_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.login().await;

        let res = app
            .get_with_token(&routes::analytics("XX999"), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn invalid_subject_code_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.login().await;

        let res = app
            .get_with_token(&routes::analytics("CO_321"), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::analytics("CO321")).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}
