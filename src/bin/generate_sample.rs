use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use rusty_convert::data::export::{export, ExportFormat, ExportRequest};
use rusty_convert::data::loader::{load_table, UploadedFile};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

#[derive(Debug, Clone, Serialize)]
struct Order {
    order_id: u32,
    region: &'static str,
    product: &'static str,
    quantity: Option<u32>,
    unit_price: Option<f64>,
    paid: bool,
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    let regions = ["North", "South", "East", "West"];
    let products = ["Widget", "Gadget", "Gizmo"];

    let mut orders: Vec<Order> = Vec::new();
    for order_id in 1..=60 {
        let quantity = (rng.next_f64() > 0.1).then(|| 1 + (rng.next_u64() % 20) as u32);
        let unit_price =
            (rng.next_f64() > 0.15).then(|| (500.0 + rng.next_f64() * 4500.0).round() / 100.0);
        let order = Order {
            order_id,
            region: *rng.pick(&regions),
            product: *rng.pick(&products),
            quantity,
            unit_price,
            paid: rng.next_f64() > 0.3,
        };
        // Roughly one order in eight is exported twice upstream.
        if rng.next_f64() < 0.125 {
            orders.push(order.clone());
        }
        orders.push(order);
    }

    let out_dir = Path::new("sample_data");
    std::fs::create_dir_all(out_dir).context("creating sample_data/")?;

    let csv_path = out_dir.join("orders.csv");
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("creating {}", csv_path.display()))?;
    for order in &orders {
        writer.serialize(order)?;
    }
    writer.flush()?;
    println!("Wrote {} orders to {}", orders.len(), csv_path.display());

    // Convert through the library so the Excel copy matches what the app
    // would produce.
    let upload = UploadedFile::from_path(&csv_path)?;
    let table = load_table(&upload)?;
    let artifact = export(&table, &ExportRequest::new(&upload.name, ExportFormat::Excel))?;
    let xlsx_path = out_dir.join(&artifact.file_name);
    std::fs::write(&xlsx_path, &artifact.bytes)
        .with_context(|| format!("writing {}", xlsx_path.display()))?;
    println!("Wrote {}", xlsx_path.display());

    Ok(())
}
