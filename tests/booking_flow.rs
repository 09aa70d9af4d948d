//! End-to-end booking workflow against a mock backend: the seat map
//! scenario, local validation, and the refresh-after-failure path.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cinema_booking::api::ApiClient;
use cinema_booking::booking::{BookingError, BookingFlow, ShowtimeContext};
use cinema_booking::config::ApiConfig;

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    })
}

fn seat_map() -> serde_json::Value {
    json!([
        { "seatId": 1, "rowLabel": "A", "seatNumber": 1, "status": "FREE" },
        { "seatId": 2, "rowLabel": "A", "seatNumber": 2, "status": "BOOKED" },
        { "seatId": 3, "rowLabel": "B", "seatNumber": 1, "status": "FREE" }
    ])
}

fn flow_for(showtime_id: i64) -> BookingFlow {
    BookingFlow::new(
        showtime_id,
        ShowtimeContext {
            movie_title: Some("Oppenheimer".into()),
            cinema_name: Some("Vue Westfield".into()),
            screen_number: Some(2),
        },
    )
}

#[tokio::test]
async fn load_toggle_and_book_two_seats() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/showtimes/9/seats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seat_map()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/showtimes/9/tickets"))
        .and(body_json(json!({ "seatIds": [1, 3] })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut flow = flow_for(9);
    flow.load(&client).await.unwrap();

    // grouped rows: A = [seat 1, seat 2], B = [seat 3]
    let rows = flow.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].label, "A");
    assert_eq!(
        rows[0].seats.iter().map(|s| s.seat_id).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(rows[1].label, "B");
    assert_eq!(rows[1].seats[0].seat_id, 3);

    // booked seat is a no-op, free seats toggle in
    assert!(!flow.toggle(2));
    assert!(flow.toggle(1));
    assert!(flow.toggle(3));
    assert_eq!(flow.selection().ids(), &[1, 3]);

    let confirmation = flow.submit(&client).await.unwrap();
    assert_eq!(confirmation.movie_title.as_deref(), Some("Oppenheimer"));
    assert_eq!(confirmation.seat_count, 2);
    assert!(flow.selection().is_empty());
}

#[tokio::test]
async fn empty_selection_fails_locally_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/showtimes/9/seats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seat_map()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/showtimes/9/tickets"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut flow = flow_for(9);
    flow.load(&client).await.unwrap();

    let err = flow.submit(&client).await.unwrap_err();
    assert!(matches!(err, BookingError::EmptySelection));
    assert_eq!(err.to_string(), "select at least one seat");
}

#[tokio::test]
async fn reload_replaces_seats_and_clears_selection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/showtimes/9/seats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seat_map()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut flow = flow_for(9);
    flow.load(&client).await.unwrap();
    flow.toggle(1);
    assert_eq!(flow.selection().len(), 1);

    flow.load(&client).await.unwrap();
    assert!(flow.selection().is_empty());
    assert_eq!(flow.seats().len(), 3);
}

#[tokio::test]
async fn failed_booking_surfaces_message_and_refreshes_map() {
    let server = MockServer::start().await;
    // first map: both seats free
    Mock::given(method("GET"))
        .and(path("/api/showtimes/9/seats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "seatId": 1, "rowLabel": "A", "seatNumber": 1, "status": "FREE" },
            { "seatId": 3, "rowLabel": "B", "seatNumber": 1, "status": "FREE" }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // booking race: someone else took seat 3
    Mock::given(method("POST"))
        .and(path("/api/showtimes/9/tickets"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({ "message": "Seat 3 is no longer available" })),
        )
        .mount(&server)
        .await;
    // the forced refresh sees the new truth
    Mock::given(method("GET"))
        .and(path("/api/showtimes/9/seats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "seatId": 1, "rowLabel": "A", "seatNumber": 1, "status": "FREE" },
            { "seatId": 3, "rowLabel": "B", "seatNumber": 1, "status": "BOOKED" }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut flow = flow_for(9);
    flow.load(&client).await.unwrap();
    flow.toggle(1);
    flow.toggle(3);

    let err = flow.submit(&client).await.unwrap_err();
    assert_eq!(err.to_string(), "Seat 3 is no longer available");

    // map was refreshed and the selection kept only the still-free seat
    assert!(flow.seats().iter().any(|s| s.seat_id == 3 && s.is_booked()));
    assert_eq!(flow.selection().ids(), &[1]);
}

#[tokio::test]
async fn load_failure_leaves_seat_state_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/showtimes/9/seats"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut flow = flow_for(9);
    let err = flow.load(&client).await.unwrap_err();
    assert_eq!(err.to_string(), "backend down");
    assert!(flow.seats().is_empty());
    assert!(flow.rows().is_empty());
}
