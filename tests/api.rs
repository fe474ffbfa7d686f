use actix_web::cookie::Cookie;
use actix_web::web::Data;
use actix_web::{App, test};
use serde_json::{Value, json};
use tempfile::TempDir;

use portail_rh::config::{Config, StorageKind};
use portail_rh::notify::Mailer;
use portail_rh::routes;
use portail_rh::store::{FileStore, Store};

const ADMIN_PASSWORD: &str = "secret";
const PEER: &str = "127.0.0.1:12345";

fn test_config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        storage: StorageKind::File,
        database_url: None,
        data_path: "data.json".to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        smtp_relay: "smtp.example.com".to_string(),
        smtp_user: None,
        smtp_pass: None,
        mail_sender: "Service RH".to_string(),
        rate_submit_per_min: 6000,
        rate_login_per_min: 6000,
        api_prefix: "/api".to_string(),
    }
}

macro_rules! spawn_app {
    ($dir:expr) => {{
        let store = Store::File(FileStore::new($dir.path().join("data.json")));
        test::init_service(
            App::new()
                .app_data(Data::new(store))
                .app_data(Data::new(test_config()))
                .app_data(Data::new(Mailer::disabled()))
                .configure(|cfg| routes::configure(cfg, test_config())),
        )
        .await
    }};
}

fn admin_cookie() -> Cookie<'static> {
    Cookie::new("admin-password", ADMIN_PASSWORD)
}

fn attestation_payload(nom: &str, matricule: &str) -> Value {
    json!({
        "nom": nom,
        "prenom": "Ali",
        "email": "ali@example.com",
        "matricule": matricule,
        "objet": "Dossier bancaire",
        "departement": "rh",
        "attestations": ["Bulletin de paie"]
    })
}

fn parada_payload(nom: &str) -> Value {
    json!({
        "nom": nom,
        "prenom": "Sana",
        "email": "sana@example.com",
        "matricule": "5678",
        "ancienneParada": "Parada Centre Ville",
        "nouvelleParada": "Parada Zone Industrielle"
    })
}

#[actix_web::test]
async fn submission_creates_a_pending_demande_with_a_unique_id() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    let req = test::TestRequest::post()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .set_json(attestation_payload("Ben Salah", "1234"))
        .to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(first["status"], "en cours");
    assert_eq!(first["nom"], "Ben Salah");
    assert!(first["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(first["createdAt"].as_str().is_some());

    let req = test::TestRequest::post()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .set_json(attestation_payload("Ben Salah", "1234"))
        .to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;

    assert_ne!(first["id"], second["id"]);
}

#[actix_web::test]
async fn submission_with_a_bad_matricule_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    for bad in ["123", "12345", "12a4"] {
        let req = test::TestRequest::post()
            .uri("/api/demande-attestation")
            .peer_addr(PEER.parse().unwrap())
            .set_json(attestation_payload("Ben Salah", bad))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "matricule {bad:?} should be rejected");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Matricule doit être 4 chiffres");
    }

    // nothing was persisted
    let req = test::TestRequest::get()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 0);
}

#[actix_web::test]
async fn list_is_admin_only() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    let req = test::TestRequest::get()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::get()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .cookie(Cookie::new("admin-password", "wrong"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn list_filters_counts_and_orders_newest_first() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    for nom in ["Ben Salah", "Salhi", "Trabelsi"] {
        let req = test::TestRequest::post()
            .uri("/api/demande-attestation")
            .peer_addr(PEER.parse().unwrap())
            .set_json(attestation_payload(nom, "1234"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let req = test::TestRequest::get()
        .uri("/api/demande-attestation?nom=SAL")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 2);
    assert_eq!(body["enCours"], 2);
    assert_eq!(body["traite"], 0);

    let demandes = body["demandes"].as_array().unwrap();
    assert_eq!(demandes.len(), 2);
    let names: Vec<_> = demandes.iter().map(|d| d["nom"].as_str().unwrap()).collect();
    assert!(names.contains(&"Ben Salah"));
    assert!(names.contains(&"Salhi"));

    let timestamps: Vec<_> = demandes
        .iter()
        .map(|d| {
            chrono::DateTime::parse_from_rfc3339(d["createdAt"].as_str().unwrap()).unwrap()
        })
        .collect();
    assert!(timestamps[0] >= timestamps[1]);
}

#[actix_web::test]
async fn date_range_filter_is_inclusive() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    let req = test::TestRequest::post()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .set_json(attestation_payload("Ben Salah", "1234"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let today = chrono::Utc::now().date_naive();
    let tomorrow = today.succ_opt().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/demande-attestation?dateFrom={today}&dateTo={today}"
        ))
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/demande-attestation?dateFrom={tomorrow}"))
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 0);
}

#[actix_web::test]
async fn pagination_reconstructs_the_filtered_set_exactly_once() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    for _ in 0..7 {
        let req = test::TestRequest::post()
            .uri("/api/demande-changement-parada")
            .peer_addr(PEER.parse().unwrap())
            .set_json(parada_payload("Trabelsi"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/demande-changement-parada?page={page}&perPage=3"
            ))
            .peer_addr(PEER.parse().unwrap())
            .cookie(admin_cookie())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 7);
        seen.extend(
            body["demandes"]
                .as_array()
                .unwrap()
                .iter()
                .map(|d| d["id"].as_str().unwrap().to_string()),
        );
    }

    assert_eq!(seen.len(), 7);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 7);
}

#[actix_web::test]
async fn processing_persists_even_when_the_notification_fails() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    let req = test::TestRequest::post()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .set_json(attestation_payload("Ben Salah", "1234"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .set_json(json!({ "id": id, "status": "traité" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["updated"]["status"], "traité");
    let email_status = body["emailStatus"].as_str().unwrap();
    assert!(
        [
            "Email envoyé avec succès !",
            "Aucun email envoyé : pas d'adresse email fournie.",
            "Erreur lors de l'envoi de l'email.",
        ]
        .contains(&email_status)
    );
    // the disabled mailer reports a send failure, the record stays processed
    assert_eq!(email_status, "Erreur lors de l'envoi de l'email.");

    let req = test::TestRequest::get()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .to_request();
    let listing: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listing["demandes"][0]["status"], "traité");
    assert_eq!(listing["traite"], 1);
    assert_eq!(listing["enCours"], 0);
}

#[actix_web::test]
async fn a_processed_demande_cannot_go_back_to_pending() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    let req = test::TestRequest::post()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .set_json(attestation_payload("Ben Salah", "1234"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .set_json(json!({ "id": id, "status": "traité" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::patch()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .set_json(json!({ "id": id, "status": "en cours" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn empty_patch_and_unknown_ids_are_rejected() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    let req = test::TestRequest::patch()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .set_json(json!({ "id": "whatever" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::patch()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .set_json(json!({ "id": "absent", "status": "traité" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn editing_the_new_parada_does_not_process_the_demande() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    let req = test::TestRequest::post()
        .uri("/api/demande-changement-parada")
        .peer_addr(PEER.parse().unwrap())
        .set_json(parada_payload("Trabelsi"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri("/api/demande-changement-parada")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .set_json(json!({ "id": id, "nouvelleParada": "Parada Stade" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["updated"]["nouvelleParada"], "Parada Stade");
    assert_eq!(body["updated"]["status"], "en cours");
    assert_eq!(body["emailStatus"], "Aucun email envoyé.");
}

#[actix_web::test]
async fn deleting_an_unknown_id_is_a_404_and_leaves_the_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    let req = test::TestRequest::post()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .set_json(attestation_payload("Ben Salah", "1234"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::delete()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .set_json(json!({ "id": "absent" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::get()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
}

#[actix_web::test]
async fn deleting_an_existing_demande_removes_it() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    let req = test::TestRequest::post()
        .uri("/api/demande-changement-parada")
        .peer_addr(PEER.parse().unwrap())
        .set_json(parada_payload("Trabelsi"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri("/api/demande-changement-parada")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .set_json(json!({ "id": id }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Demande supprimée avec succès.");

    let req = test::TestRequest::get()
        .uri("/api/demande-changement-parada")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 0);
}

#[actix_web::test]
async fn send_email_reports_the_dispatch_outcome() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    let req = test::TestRequest::post()
        .uri("/api/send-email")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .set_json(json!({ "id": "absent" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::post()
        .uri("/api/demande-attestation")
        .peer_addr(PEER.parse().unwrap())
        .set_json(attestation_payload("Ben Salah", "1234"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    // the disabled mailer collapses to a send failure
    let req = test::TestRequest::post()
        .uri("/api/send-email")
        .peer_addr(PEER.parse().unwrap())
        .cookie(admin_cookie())
        .set_json(json!({ "id": id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);
}

#[actix_web::test]
async fn login_sets_the_admin_cookie_and_rejects_bad_passwords() {
    let dir = TempDir::new().unwrap();
    let app = spawn_app!(&dir);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .peer_addr(PEER.parse().unwrap())
        .set_json(json!({ "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .peer_addr(PEER.parse().unwrap())
        .set_json(json!({ "password": ADMIN_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "admin-password")
        .expect("login should set the admin cookie");
    assert_eq!(cookie.value(), ADMIN_PASSWORD);
}
