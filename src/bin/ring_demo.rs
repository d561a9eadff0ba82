// Walks a small cluster through routing, bulk traffic and a node removal.

use std::num::NonZeroU32;

use rand::{rng, RngExt};
use ringroute::{HashRing, Node, RingConfig, Request};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_POINT_MULTIPLIER: u32 = 50;
const DEFAULT_BULK_REQUESTS: usize = 10_000;
const DEFAULT_LOG_LEVEL: &str = "info";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().collect();
    let point_multiplier = if args.len() > 1 {
        args[1].parse::<u32>()?
    } else {
        DEFAULT_POINT_MULTIPLIER
    };
    let bulk_requests = if args.len() > 2 {
        args[2].parse::<usize>()?
    } else {
        DEFAULT_BULK_REQUESTS
    };

    let config = RingConfig::default().with_point_multiplier(point_multiplier);
    let ring = HashRing::from_config(&config)?;
    info!(point_multiplier, bulk_requests, "starting ring demo");

    let node_b = Node::with_weight("node-b", "10.0.0.2", NonZeroU32::new(2).ok_or("zero weight")?);
    ring.add_node(Node::new("node-a", "10.0.0.1"));
    ring.add_node(node_b.clone());
    ring.add_node(Node::new("node-c", "10.0.0.3"));

    let requests = vec![
        Request::new("req-1001", "svc-1", "GET"),
        Request::new("req-2002", "svc-1", "POST"),
        Request::new("req-3003", "svc-1", "GET"),
        Request::new("req-4004", "svc-1", "PUT"),
        Request::new("req-5005", "svc-1", "DELETE"),
    ];

    println!("Consistent hashing assignments:");
    print_assignments(&ring, &requests);

    let methods = ["GET", "POST", "PUT", "DELETE"];
    let mut rng = rng();
    for i in 0..bulk_requests {
        let request = Request::new(
            format!("bulk-{}", rng.random_range(0..1_000_000u32)),
            format!("svc-{}", i % 4),
            methods[rng.random_range(0..methods.len())],
        );
        ring.handle_request(&request);
    }

    println!("\nLoads after {} requests:", bulk_requests);
    print_loads(&ring);

    println!("\nRemoving node-b and reassigning:");
    ring.remove_node(&node_b);
    print_assignments(&ring, &requests);

    println!("\nLoads (node-b history retained):");
    print_loads(&ring);

    println!();
    ring.write_ring_state(&mut std::io::stdout())?;

    Ok(())
}

fn print_assignments(ring: &HashRing, requests: &[Request]) {
    for request in requests {
        match ring.assign(request) {
            Some(node) => println!("{} -> {} ({})", request.id, node.id, node.address),
            None => println!("{} -> (no node available)", request.id),
        }
    }
}

fn print_loads(ring: &HashRing) {
    let mut loads: Vec<(String, u64)> = ring.snapshot_loads().into_iter().collect();
    loads.sort();
    for (node_id, load) in loads {
        println!("  {}: {}", node_id, load);
    }
}
