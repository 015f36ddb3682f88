//! Example: cluster a synthetic table-top scene into graspable objects.
//!
//! Three blobs sit on a table: a mug and a bowl touching each other, and a
//! box further away. Sparse sensor noise is scattered around them.
//!
//! Run with: RUST_LOG=debug cargo run --example cluster_scene -p ruvector-pointcluster

use ruvector_pointcluster::{ClusterConfig, Clusterer, Point3D, PointSet};
use tracing_subscriber::EnvFilter;

fn blob(cloud: &mut PointSet<[u8; 3]>, center: [f64; 3], radius: f64, color: [u8; 3]) {
    let steps = 12;
    for i in 0..steps {
        for j in 0..steps {
            let theta = i as f64 / steps as f64 * std::f64::consts::TAU;
            let phi = j as f64 / steps as f64 * std::f64::consts::PI;
            let p = Point3D::new(
                center[0] + radius * phi.sin() * theta.cos(),
                center[1] + radius * phi.sin() * theta.sin(),
                center[2] + radius * phi.cos(),
            );
            cloud.set(p, color).expect("finite coordinate");
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Table-top Clustering ===");
    println!();

    let mut cloud = PointSet::new();
    blob(&mut cloud, [0.0, 0.0, 40.0], 35.0, [200, 30, 30]); // mug
    blob(&mut cloud, [75.0, 0.0, 40.0], 40.0, [30, 200, 30]); // bowl
    blob(&mut cloud, [400.0, 250.0, 50.0], 45.0, [30, 30, 200]); // box

    for i in 0..10 {
        let f = i as f64;
        cloud.set(Point3D::new(-600.0 + f * 97.0, 600.0 - f * 31.0, 5.0), [90, 90, 90])?;
    }

    let config = ClusterConfig::from_json_str(
        r#"{"max-distance": 15.0, "min-points-per-segment": 5, "min-points-per-cluster": 50}"#,
    )?;
    let clusterer = Clusterer::new(config)?;
    let report = clusterer.cluster_with_report(&cloud, None)?;

    println!("Input points: {}", report.stats.input_points);
    println!(
        "Buckets: {}  segments: {}  passes: {}  merges: {}",
        report.stats.buckets, report.stats.segments, report.stats.passes, report.stats.merges,
    );
    println!();

    for (i, c) in report.clusters.iter().enumerate() {
        let md = c.metadata();
        println!(
            "[object {}] {} points, center ({:.1}, {:.1}, {:.1}), radius {:.1}",
            i, md.count, md.centroid.x, md.centroid.y, md.centroid.z, md.max_extent,
        );
    }

    println!();
    println!("Dropped as noise: {} points", report.stats.points_below_segment_minimum);
    Ok(())
}
