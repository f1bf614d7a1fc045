use route_finder::{search_marked, Algorithm, RouteGrid};

// In this example every algorithm is run on a 6x8 grid with shape
//  ________
// |S...#...|
// |.##.#.#.|
// |.#..#.#.|
// |.#.##.#.|
// |.#....#T|
// |...##...|
//  ________
// where
// - # marks an obstacle
// - S marks the start
// - T marks the target
//
// Expanded cells are painted as o and the path as *.

const MAP: &str = "
    S...#...
    .##.#.#.
    .#..#.#.
    .#.##.#.
    .#....#T
    ...##...
";

fn main() {
    let mut grid: RouteGrid = MAP.parse().unwrap();
    for algorithm in Algorithm::ALL {
        grid.clear_markers();
        let result = search_marked(&mut grid, algorithm).unwrap();
        grid.mark_result(&result).unwrap();
        println!(
            "{}: path of {} steps, {} cells expanded",
            algorithm,
            result.steps(),
            result.visited_count()
        );
        println!("{}", grid);
    }
}
