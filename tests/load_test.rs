//! Load testing for the gateway.

use std::time::{Duration, Instant};

use serde_json::json;

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_load_performance() {
    // 1. Mock upstream with a little latency
    let mock = common::start_mock_upstream(|_| async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        (200, json!({"name": "Colt"}).to_string())
    })
    .await;

    // 2. Gateway
    let gateway = common::spawn_gateway(common::config_for(&mock)).await;

    // 3. Run load: every task walks the same set of tags, so after the
    //    first round most lookups are served from the cache.
    let concurrency = 20;
    let requests_per_task = 50;
    let distinct_tags = 10;
    let total_requests = concurrency * requests_per_task;

    let start = Instant::now();
    let mut tasks = Vec::new();
    for task_id in 0..concurrency {
        let client = gateway.client().clone();
        let base = gateway.url("/api/brawl");
        tasks.push(tokio::spawn(async move {
            let mut latencies = Vec::new();
            for i in 0..requests_per_task {
                let tag = format!("TAG{:03}", (task_id + i) % distinct_tags);
                let url = format!("{}/load-{}/{}", base, task_id, tag);
                let req_start = Instant::now();
                if let Ok(res) = client.get(&url).send().await {
                    if res.status().is_success() {
                        latencies.push(req_start.elapsed());
                    }
                }
            }
            latencies
        }));
    }

    let mut all_latencies = Vec::new();
    for task in tasks {
        all_latencies.extend(task.await.unwrap());
    }

    let duration = start.elapsed();
    let rps = total_requests as f64 / duration.as_secs_f64();

    assert_eq!(all_latencies.len(), total_requests, "Every lookup should succeed");
    // Concurrent misses for one tag are not coalesced, so the upstream may
    // see a few duplicates, but never one call per request.
    assert!(mock.calls() >= distinct_tags);
    assert!(mock.calls() < total_requests);

    all_latencies.sort();
    let p50 = all_latencies[all_latencies.len() / 2];
    let p95 = all_latencies[(all_latencies.len() as f64 * 0.95) as usize];
    let p99 = all_latencies[(all_latencies.len() as f64 * 0.99) as usize];

    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Concurrency:    {}", concurrency);
    println!("Upstream Calls: {}", mock.calls());
    println!("Total Duration: {:?}", duration);
    println!("Requests/sec:   {:.2}", rps);
    println!("P50 Latency:    {:?}", p50);
    println!("P95 Latency:    {:?}", p95);
    println!("P99 Latency:    {:?}", p99);
    println!("-------------------------\n");
}
