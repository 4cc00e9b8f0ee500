#![allow(dead_code)]

use std::net::SocketAddr;

use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serve a router on an ephemeral local port and return its address.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("fixture server should bind");
    let addr = listener.local_addr().expect("listener has a local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fixture server");
    });
    addr
}

/// Search response with one broadcast hit and one article hit, mirroring
/// what the catalog returns for "Swound Sound".
pub fn search_fixture(broadcast_href: &str) -> Value {
    json!({
        "took": 3,
        "isTimedOut": false,
        "length": 2,
        "total": 2,
        "hits": [
            {
                "data": {
                    "href": broadcast_href,
                    "station": "fm4",
                    "entity": "Broadcast",
                    "id": 123,
                    "broadcastDay": 20220806,
                    "programKey": "4SS",
                    "title": "Swound Sound Session",
                    "subtitle": "<p>Fresh cuts</p>",
                    "startISO": "2022-08-06T19:00:00+02:00",
                    "endISO": "2022-08-06T21:00:00+02:00",
                    "images": []
                }
            },
            {
                "data": {
                    "href": "https://audioapi.orf.at/fm4/api/json/4.0/article/999",
                    "entity": "Article",
                    "title": "Swound Sound retrospective"
                }
            }
        ],
        "suggest": []
    })
}

/// Zero-hit search response carrying a spelling suggestion, mirroring a
/// misspelled "Zummerservice" query.
pub fn no_result_fixture() -> Value {
    json!({
        "took": 1,
        "total": 0,
        "hits": [],
        "suggest": [
            { "text": "zimmerservice", "highlighted": "<em>zimmerservice</em>", "score": 0.7 }
        ]
    })
}

/// Broadcast detail document with one stream and a 434px cover variant.
pub fn broadcast_fixture() -> Value {
    json!({
        "entity": "Broadcast",
        "title": "Swound Sound Session",
        "subtitle": "<p>Fresh cuts</p> ",
        "broadcastDay": 20220806,
        "programKey": "4SS",
        "startISO": "2022-08-06T19:00:00+02:00",
        "endISO": "2022-08-06T21:00:00+02:00",
        "images": [
            {
                "versions": [
                    { "path": "https://radiobilder.orf.at/fm4/width200/4SS.jpg", "width": 200 },
                    { "path": "https://radiobilder.orf.at/fm4/width434/4SS.jpg", "width": 434 }
                ]
            }
        ],
        "streams": [
            { "loopStreamId": "2022-08-06_1900_tl_54_7DaysSat5_131332.mp3" }
        ]
    })
}
