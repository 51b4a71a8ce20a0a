use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use crew_core_rs::{AccessCoordinator, AccessMode, ConfigOption, Coordinator};
use parking_lot::RwLock;
use tracing_subscriber::EnvFilter;

// The coordinator owns no data; the map is only touched inside its windows.
// The RwLock merely makes the shared map expressible in safe Rust.
type Inventory = Arc<RwLock<HashMap<String, u32>>>;

fn main() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .try_init();

  let mode = env::args()
    .nth(1)
    .and_then(|arg| AccessMode::from_str(&arg).ok())
    .unwrap_or_default();

  let coordinator = Coordinator::with_options([
    ConfigOption::with_mode(mode),
    ConfigOption::with_worker_name("inventory-writer"),
    ConfigOption::with_log_prefix("inventory"),
  ])
  .expect("failed to start coordinator");
  let inventory: Inventory = Arc::default();

  let handles = (0..4)
    .map(|clerk| {
      let coordinator = coordinator.clone();
      let inventory = inventory.clone();
      thread::spawn(move || {
        for round in 0..5 {
          let item = format!("item-{}", (clerk + round) % 3);
          let stocked = inventory.clone();
          let key = item.clone();
          coordinator.write(move || {
            *stocked.write().entry(key).or_insert(0) += 1;
          });
          let count = coordinator.read(|| inventory.read().get(&item).copied().unwrap_or(0));
          println!("clerk {} sees {} x {}", clerk, count, item);
        }
      })
    })
    .collect::<Vec<_>>();

  for handle in handles {
    handle.join().expect("clerk thread panicked");
  }

  coordinator.flush();
  let total = coordinator.read(|| inventory.read().values().sum::<u32>());
  println!("mode = {}, total stocked = {}", coordinator.mode(), total);
}
