pub mod regular_dijkstra;
mod state;
pub mod traced_dijkstra;

pub use regular_dijkstra::dijkstra_path_weights;
pub use traced_dijkstra::shortest_path;
