//! Concurrent load against the rendering endpoints.

use std::time::{Duration, Instant};

use reqwest::StatusCode;

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_renders_are_identical() {
    let server = common::start_server(common::test_config()).await;
    let url = server.url("/qr?url=https://example.com/load&size=400");
    let client = common::client();

    let reference = client.get(&url).send().await.unwrap().bytes().await.unwrap();

    let concurrency = 16;
    let requests_per_task = 10;
    let start = Instant::now();

    let mut handles = Vec::new();
    for _ in 0..concurrency {
        let client = client.clone();
        let url = url.clone();
        handles.push(tokio::spawn(async move {
            let mut bodies = Vec::new();
            for _ in 0..requests_per_task {
                let res = client.get(&url).send().await.unwrap();
                assert_eq!(res.status(), StatusCode::OK);
                bodies.push(res.bytes().await.unwrap());
            }
            bodies
        }));
    }

    let mut total = 0;
    for handle in handles {
        for body in handle.await.unwrap() {
            assert_eq!(body, reference, "render output must not vary");
            total += 1;
        }
    }

    let elapsed = start.elapsed();
    println!("{} renders in {:?}", total, elapsed);
    assert_eq!(total, concurrency * requests_per_task);
    assert!(elapsed < Duration::from_secs(60));
}
