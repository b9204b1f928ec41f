//! HTTP adapter behaviour against an in-process mock of the LoanLink API.
//!
//! Each test starts an Actix server on an ephemeral port, scripts the
//! replies it should give and inspects the requests the client sent.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::Method;
use actix_web::{App as ActixApp, HttpRequest, HttpResponse, HttpServer, web};
use loanlink::cli::{App, Command, FilterArgs, LoansCommand};
use loanlink::domain::ports::{LoanApplications, LoanCatalogue, StatusChange, UserDirectory};
use loanlink::domain::{
    ALREADY_APPLIED, ApplicantDetails, ApplicationId, ApplicationStatus,
    ApplicationSubmissionService, BearerToken, Destination, Email, ErrorCode, LoanDraft, LoanId,
    LoanProduct, ReviewDecision, ReviewService, Role, Session, SessionContext, SignInService,
    Suspension, UserAccount, UserId,
};
use loanlink::outbound::http::ApiClient;
use mockable::DefaultClock;
use reqwest::Url;
use rstest::rstest;
use serde_json::{Value, json};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    query: String,
    authorization: Option<String>,
    body: Option<Value>,
}

#[derive(Default)]
struct MockApi {
    replies: Mutex<HashMap<(String, String), (u16, Value)>>,
    recorded: Mutex<Vec<Recorded>>,
}

impl MockApi {
    fn reply(&self, method: Method, path: &str, status: u16, body: Value) {
        self.replies
            .lock()
            .expect("replies lock")
            .insert((method.to_string(), path.to_owned()), (status, body));
    }

    fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().expect("recorded lock").clone()
    }
}

async fn respond(
    request: HttpRequest,
    body: web::Bytes,
    api: web::Data<MockApi>,
) -> HttpResponse {
    let method = request.method().to_string();
    let path = request.path().to_owned();
    api.recorded.lock().expect("recorded lock").push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: request.query_string().to_owned(),
        authorization: request
            .headers()
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&body).ok(),
    });
    let reply = api
        .replies
        .lock()
        .expect("replies lock")
        .get(&(method, path))
        .cloned();
    match reply {
        Some((status, value)) => HttpResponse::build(
            actix_web::http::StatusCode::from_u16(status).expect("valid status"),
        )
        .json(value),
        None => HttpResponse::NotFound().json(json!({"message": "no such route"})),
    }
}

struct MockServer {
    api: web::Data<MockApi>,
    base: Url,
    handle: ServerHandle,
}

impl MockServer {
    fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        let api = web::Data::new(MockApi::default());
        let data = api.clone();
        let server = HttpServer::new(move || {
            ActixApp::new()
                .app_data(data.clone())
                .default_service(web::to(respond))
        })
        .disable_signals()
        .workers(1)
        .listen(listener)
        .expect("listen")
        .run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        Self {
            api,
            base: Url::parse(&format!("http://{addr}/")).expect("base url"),
            handle,
        }
    }

    fn client(&self) -> ApiClient {
        ApiClient::new(self.base.clone(), Duration::from_secs(5)).expect("client")
    }

    fn signed_in_client(&self) -> ApiClient {
        self.client()
            .with_token(BearerToken::new("id-token").expect("token"))
    }

    async fn stop(self) {
        self.handle.stop(true).await;
    }
}

fn session(role: Role, email: &str) -> Session {
    let account = UserAccount::try_from_parts("u-1", email, role).expect("account");
    Session::new(account, BearerToken::new("id-token").expect("token"))
}

fn quick_assist_json() -> Value {
    json!({
        "_id": "65a0c1",
        "title": "Quick Assist Loan",
        "category": "Personal",
        "interest": 9.2,
        "maxLoanLimit": 50000,
        "description": "Short-term help for urgent expenses.",
        "availableEMIPlans": [3, 6, 12],
        "createdBy": "manager@loanlink.test",
        "showHome": true
    })
}

fn application_json(id: &str, loan_id: &str) -> Value {
    json!({
        "_id": id,
        "loanId": loan_id,
        "loanTitle": "Quick Assist Loan",
        "interestRate": 9.2,
        "userEmail": "nusrat@loanlink.test",
        "firstName": "Nusrat",
        "lastName": "Jahan",
        "contactNumber": "+8801700000000",
        "nationalId": "1990123456",
        "loanAmount": "8000",
        "monthlyIncome": 30000,
        "incomeSource": "Salary",
        "reason": "Medical bills",
        "address": "12 Lake Road, Dhaka",
        "status": "Pending",
        "applicationFeeStatus": "Unpaid"
    })
}

fn applicant() -> ApplicantDetails {
    ApplicantDetails {
        first_name: "Nusrat".to_owned(),
        last_name: "Jahan".to_owned(),
        contact_number: "+8801700000000".to_owned(),
        national_id: "1990123456".to_owned(),
        requested_amount: 8_000.0,
        monthly_income: 30_000.0,
        income_source: "Salary".to_owned(),
        reason: "Medical bills".to_owned(),
        address: "12 Lake Road, Dhaka".to_owned(),
        notes: None,
    }
}

fn email(raw: &str) -> Email {
    Email::new(raw).expect("email")
}

#[rstest]
#[actix_web::test]
async fn bearer_token_is_attached_to_requests() {
    let server = MockServer::start();
    server
        .api
        .reply(Method::GET, "/loans", 200, json!([quick_assist_json()]));

    let loans = server
        .signed_in_client()
        .list_loans()
        .await
        .expect("loans load");

    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].title(), "Quick Assist Loan");
    let recorded = server.api.recorded();
    assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer id-token"));
    server.stop().await;
}

#[rstest]
#[actix_web::test]
async fn anonymous_reads_send_no_credentials() {
    let server = MockServer::start();
    server
        .api
        .reply(Method::GET, "/loans/65a0c1", 200, quick_assist_json());

    let loan = server
        .client()
        .get_loan(&LoanId::new("65a0c1").expect("loan id"))
        .await
        .expect("loan loads");

    assert_eq!(loan.emi_plans(), &[3, 6, 12]);
    assert!(server.api.recorded()[0].authorization.is_none());
    server.stop().await;
}

#[rstest]
#[actix_web::test]
async fn server_message_is_surfaced_verbatim() {
    let server = MockServer::start();
    server.api.reply(
        Method::GET,
        "/loan-applications/user/nusrat@loanlink.test",
        200,
        json!([]),
    );
    server.api.reply(
        Method::POST,
        "/loan-applications",
        409,
        json!({"message": "Duplicate application"}),
    );
    let client = Arc::new(server.signed_in_client());
    let product: LoanProduct = serde_json::from_value(quick_assist_json()).expect("product");

    let error = ApplicationSubmissionService::new(client, Arc::new(DefaultClock))
        .submit(
            &session(Role::Borrower, "nusrat@loanlink.test"),
            &product,
            applicant(),
        )
        .await
        .expect_err("rejected");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "Duplicate application");
    server.stop().await;
}

#[rstest]
#[actix_web::test]
async fn duplicate_application_is_blocked_before_posting() {
    let server = MockServer::start();
    server.api.reply(
        Method::GET,
        "/loan-applications/user/nusrat@loanlink.test",
        200,
        json!([application_json("app-1", "65a0c1")]),
    );
    let client = Arc::new(server.signed_in_client());
    let product: LoanProduct = serde_json::from_value(quick_assist_json()).expect("product");

    let error = ApplicationSubmissionService::new(client, Arc::new(DefaultClock))
        .submit(
            &session(Role::Borrower, "nusrat@loanlink.test"),
            &product,
            applicant(),
        )
        .await
        .expect_err("already applied");

    assert_eq!(error.message(), ALREADY_APPLIED);
    assert!(
        server
            .api
            .recorded()
            .iter()
            .all(|request| request.method != "POST")
    );
    server.stop().await;
}

#[rstest]
#[actix_web::test]
async fn submission_posts_the_combined_payload() {
    let server = MockServer::start();
    server.api.reply(
        Method::GET,
        "/loan-applications/user/nusrat@loanlink.test",
        200,
        json!([]),
    );
    server.api.reply(
        Method::POST,
        "/loan-applications",
        201,
        json!({"acknowledged": true, "insertedId": "app-9"}),
    );
    let client = Arc::new(server.signed_in_client());
    let product: LoanProduct = serde_json::from_value(quick_assist_json()).expect("product");

    let outcome = ApplicationSubmissionService::new(client, Arc::new(DefaultClock))
        .submit(
            &session(Role::Borrower, "nusrat@loanlink.test"),
            &product,
            applicant(),
        )
        .await
        .expect("submitted");

    assert_eq!(outcome.application.id().as_ref(), "app-9");
    assert_eq!(outcome.next, Destination::MyLoans);
    let posted = server
        .api
        .recorded()
        .into_iter()
        .find(|request| request.method == "POST")
        .and_then(|request| request.body)
        .expect("posted body");
    assert_eq!(posted["loanId"], "65a0c1");
    assert_eq!(posted["loanTitle"], "Quick Assist Loan");
    assert_eq!(posted["userEmail"], "nusrat@loanlink.test");
    assert_eq!(posted["loanAmount"], 8000.0);
    assert!(posted.get("status").is_none());
    server.stop().await;
}

#[rstest]
#[case::manager("manager", Role::Manager)]
#[case::missing_role("", Role::Borrower)]
#[actix_web::test]
async fn sign_in_resolves_the_role(#[case] stored: &str, #[case] expected: Role) {
    let server = MockServer::start();
    server.api.reply(
        Method::GET,
        "/users/amina@loanlink.test",
        200,
        json!({"_id": "u-3", "email": "amina@loanlink.test", "role": stored}),
    );
    let client = Arc::new(server.signed_in_client());
    let mut context = SessionContext::signed_out();

    let next = SignInService::new(client)
        .sign_in(
            &mut context,
            email("amina@loanlink.test"),
            BearerToken::new("id-token").expect("token"),
        )
        .await
        .expect("signed in");

    assert_eq!(next, Destination::DashboardHome);
    assert_eq!(context.session().map(Session::role), Some(expected));
    server.stop().await;
}

#[rstest]
#[actix_web::test]
async fn failed_role_lookup_signs_in_as_borrower() {
    let server = MockServer::start();
    let client = Arc::new(server.signed_in_client());
    let mut context = SessionContext::signed_out();

    SignInService::new(client)
        .sign_in(
            &mut context,
            email("amina@loanlink.test"),
            BearerToken::new("id-token").expect("token"),
        )
        .await
        .expect("signed in");

    assert_eq!(context.session().map(Session::role), Some(Role::Borrower));
    server.stop().await;
}

#[rstest]
#[actix_web::test]
async fn approval_patches_status_and_timestamp() {
    let server = MockServer::start();
    server.api.reply(
        Method::GET,
        "/loan-applications/status/pending",
        200,
        json!([application_json("app-1", "65a0c1")]),
    );
    server.api.reply(
        Method::PATCH,
        "/loan-applications/app-1",
        200,
        json!({"modifiedCount": 1}),
    );
    let client = Arc::new(server.signed_in_client());

    let change = ReviewService::new(client, Arc::new(DefaultClock))
        .decide(
            &session(Role::Manager, "manager@loanlink.test"),
            &ApplicationId::new("app-1").expect("application id"),
            ReviewDecision::Approve,
        )
        .await
        .expect("approved");

    assert_eq!(change.status, ApplicationStatus::Approved);
    let patch = server
        .api
        .recorded()
        .into_iter()
        .find(|request| request.method == "PATCH")
        .and_then(|request| request.body)
        .expect("patch body");
    assert_eq!(patch["status"], "Approved");
    assert!(patch.get("approvedAt").is_some());
    assert!(patch.get("rejectedAt").is_none());
    server.stop().await;
}

#[rstest]
#[actix_web::test]
async fn status_listings_use_the_expected_routes() {
    let server = MockServer::start();
    server
        .api
        .reply(Method::GET, "/loan-applications", 200, json!([]));
    let client = server.signed_in_client();

    client
        .list_all(Some(ApplicationStatus::Approved))
        .await
        .expect("listing");
    client
        .update_status(
            &ApplicationId::new("app-2").expect("application id"),
            StatusChange {
                status: ApplicationStatus::Rejected,
                decided_at: chrono::Utc::now(),
            },
        )
        .await
        .expect_err("unscripted route answers 404");

    let recorded = server.api.recorded();
    assert_eq!(recorded[0].query, "status=Approved");
    assert_eq!(recorded[1].method, "PATCH");
    assert_eq!(recorded[1].path, "/loan-applications/app-2");
    server.stop().await;
}

#[rstest]
#[actix_web::test]
async fn role_change_and_suspension_send_bodies() {
    let server = MockServer::start();
    server.api.reply(
        Method::PATCH,
        "/users/role/member@loanlink.test",
        200,
        json!({"modifiedCount": 1}),
    );
    server
        .api
        .reply(Method::DELETE, "/users/u-9/suspend", 200, json!({}));
    let client = server.signed_in_client();

    client
        .update_role(&email("member@loanlink.test"), Role::Manager)
        .await
        .expect("role updated");
    client
        .suspend(
            &UserId::new("u-9").expect("user id"),
            &Suspension::new("Fraud", "Documents were forged.").expect("suspension"),
        )
        .await
        .expect("suspended");

    let recorded = server.api.recorded();
    assert_eq!(recorded[0].body, Some(json!({"role": "manager"})));
    assert_eq!(
        recorded[1].body,
        Some(json!({"reason": "Fraud", "feedback": "Documents were forged."}))
    );
    server.stop().await;
}

#[rstest]
#[actix_web::test]
async fn catalogue_command_filters_remote_loans() {
    let server = MockServer::start();
    let mut pricey = quick_assist_json();
    pricey["_id"] = json!("65a0c2");
    pricey["title"] = json!("Premium Business Loan");
    pricey["interest"] = json!(18.5);
    server.api.reply(
        Method::GET,
        "/loans",
        200,
        json!([quick_assist_json(), pricey]),
    );
    let mut app = App::new(
        server.client(),
        SessionContext::signed_out(),
        Arc::new(DefaultClock),
    );
    let mut out = Vec::new();

    app.run(
        Command::Loans(LoansCommand::List(FilterArgs {
            query: "quick".to_owned(),
            max_interest: 15.0,
            max_amount: 100_000.0,
            category: String::new(),
            all: false,
        })),
        &mut out,
    )
    .await
    .expect("listing runs");

    let output = String::from_utf8(out).expect("utf-8");
    assert!(output.contains("Quick Assist Loan"));
    assert!(!output.contains("Premium Business Loan"));
    server.stop().await;
}

#[rstest]
#[actix_web::test]
async fn catalogue_reads_records_written_by_other_clients() {
    let server = MockServer::start();
    let form_loan = json!({
        "_id": "6650aa01",
        "id": 1_718_000_000_000_u64,
        "Loan Image": "https://img.loanlink.test/edu.png",
        "Loan Title": "Education Boost",
        "Loan Category": "Education",
        "Interest": 7.5,
        "Max Loan Limit": 80000,
        "description": "Tuition support.",
        "availableEMIPlans": [6, 12],
        "title": "Education Boost Plus",
        "interest": 7.0
    });
    server.api.reply(
        Method::GET,
        "/loans",
        200,
        json!([quick_assist_json(), form_loan]),
    );

    let loans = server.client().list_loans().await.expect("catalogue decodes");

    let titles = loans.iter().map(LoanProduct::title).collect::<Vec<_>>();
    assert_eq!(titles, ["Quick Assist Loan", "Education Boost Plus"]);
    assert_eq!(loans[1].id().as_ref(), "6650aa01");
    server.stop().await;
}

#[rstest]
#[actix_web::test]
async fn loan_writes_use_the_stored_key_names() {
    let server = MockServer::start();
    server.api.reply(
        Method::POST,
        "/loans",
        200,
        json!({"acknowledged": true, "insertedId": "65a0d0"}),
    );
    server
        .api
        .reply(Method::PATCH, "/loans/65a0d0", 200, json!({"modifiedCount": 1}));
    let client = server.signed_in_client();
    let draft = LoanDraft {
        title: "Solar Upgrade".to_owned(),
        category: "Home".to_owned(),
        interest_rate: 6.5,
        max_loan_limit: 40_000.0,
        description: "Rooftop panels.".to_owned(),
        emi_plans: vec![12, 24],
        image_url: Some("https://img.loanlink.test/solar.png".to_owned()),
        show_on_home: false,
    };

    let id = client
        .create_loan(&draft, &email("manager@loanlink.test"))
        .await
        .expect("created");
    client.update_loan(&id, &draft).await.expect("updated");

    let recorded = server.api.recorded();
    let expected = json!({
        "title": "Solar Upgrade",
        "category": "Home",
        "interest": 6.5,
        "maxLoanLimit": 40000.0,
        "description": "Rooftop panels.",
        "availableEMIPlans": [12, 24],
        "image": "https://img.loanlink.test/solar.png",
        "showHome": false
    });
    let mut created = expected.clone();
    created["createdBy"] = json!("manager@loanlink.test");
    assert_eq!(recorded[0].body, Some(created));
    assert_eq!(recorded[1].method, "PATCH");
    assert_eq!(recorded[1].path, "/loans/65a0d0");
    assert_eq!(recorded[1].body, Some(expected));
    server.stop().await;
}
