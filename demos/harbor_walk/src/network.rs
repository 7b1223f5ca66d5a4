//! Synthetic harbour-district street grid.
//!
//! A `GRID_SIDE × GRID_SIDE` lattice of intersections laid out in lat/lon
//! around a fixed origin and projected to planar metres.  The southern row
//! is a waterfront promenade (footway); every other street is residential.

use sr_core::{EdgeId, GeoPoint, NodeId};
use sr_network::{Edge, Node, WeightedRoadNetwork};

pub const GRID_SIDE: u32 = 6;
/// Spacing between intersections, degrees.
const STEP_DEG: f64 = 0.0015;

pub const ORIGIN: GeoPoint = GeoPoint { lat: 30.6880, lon: -88.0470 };

pub fn node_id(row: u32, col: u32) -> NodeId {
    NodeId(row * GRID_SIDE + col + 1)
}

fn geo(row: u32, col: u32) -> GeoPoint {
    GeoPoint::new(ORIGIN.lat + row as f64 * STEP_DEG, ORIGIN.lon + col as f64 * STEP_DEG)
}

/// Build the grid with the given penalty factor.
pub fn build_network(penalty_factor: f64) -> anyhow::Result<WeightedRoadNetwork> {
    let mut net = WeightedRoadNetwork::new(penalty_factor)?;

    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            let kind = match (row, col) {
                (0, 0) => "ferry_terminal",
                (r, c) if r == GRID_SIDE - 1 && c == GRID_SIDE - 1 => "hotel",
                (2, 3) => "police_station",
                _ => "intersection",
            };
            net.add_node(
                Node::new(node_id(row, col), geo(row, col).project(ORIGIN))
                    .named(format!("{}{}", (b'A' + row as u8) as char, col + 1))
                    .with_kind(kind),
            )?;
        }
    }

    let mut next = 0u32;
    let mut road = |net: &mut WeightedRoadNetwork, a: (u32, u32), b: (u32, u32)| -> anyhow::Result<()> {
        let distance = geo(a.0, a.1).distance_m(geo(b.0, b.1));
        let road_type = if a.0 == 0 && b.0 == 0 { "footway" } else { "residential" };
        net.add_edge(
            Edge::new(EdgeId(next), node_id(a.0, a.1), node_id(b.0, b.1), distance)
                .with_road_type(road_type),
        )?;
        next += 1;
        Ok(())
    };

    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            if col + 1 < GRID_SIDE {
                road(&mut net, (row, col), (row, col + 1))?;
            }
            if row + 1 < GRID_SIDE {
                road(&mut net, (row, col), (row + 1, col))?;
            }
        }
    }
    Ok(net)
}
