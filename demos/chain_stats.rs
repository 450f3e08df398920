use std::hash::BuildHasher;

use clap::Parser;
use sparse_hash::HashMap;
use sparse_hash::TableConfig;
use sparse_hash::policy::DefaultEq;
use sparse_hash::policy::DefaultHashBuilder;

#[derive(Parser, Debug)]
struct Args {
    /// Number of keys to insert.
    #[arg(short = 'n', long = "count", default_value_t = 100_000)]
    count: u64,

    /// Initial bucket count hint.
    #[arg(short = 'b', long = "buckets", default_value_t = 0)]
    buckets: usize,

    /// Maximum load factor before a rehash.
    #[arg(short = 'l', long = "max_load_factor", default_value_t = 2.0)]
    max_load_factor: f32,

    /// Erase every n-th key after filling (0 disables).
    #[arg(short = 'e', long = "erase_every", default_value_t = 0)]
    erase_every: u64,
}

fn main() -> Result<(), sparse_hash::Error> {
    let args = Args::parse();

    let config = TableConfig::new()
        .with_bucket_hint(args.buckets)
        .with_max_load_factor(args.max_load_factor)?;
    let hash_builder = DefaultHashBuilder::default();
    let mut map: HashMap<u64, u64> = HashMap::with_config(config, hash_builder, DefaultEq);

    println!(
        "Filling map with {} keys (bucket hint {}, max load factor {:.2})...",
        args.count, args.buckets, args.max_load_factor
    );
    for key in 0..args.count {
        map.insert(key, key.wrapping_mul(31));
    }

    if args.erase_every > 0 {
        let before = map.len();
        for key in (0..args.count).step_by(args.erase_every as usize) {
            map.erase(&key);
        }
        println!("Erased {} keys", before - map.len());
    }

    for key in 0..args.count {
        let expected = args.erase_every == 0 || key % args.erase_every != 0;
        assert_eq!(
            map.contains_key(&key),
            expected,
            "key {key} (hash {:#x})",
            map.hasher().hash_one(key)
        );
    }

    map.chain_stats().print();
    Ok(())
}
