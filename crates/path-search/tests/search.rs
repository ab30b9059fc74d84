//! Integration tests exercising [`path_search::AStar`] end to end, including
//! the terminus relocation path for a terminus that falls outside the grid.

use elevation_grid::Grid;
use geo_primitives::Lla;
use path_search::AStar;

fn grid_with_wall(n: usize, wall_lon: usize, gap_lat: usize) -> Grid {
    let data: Vec<Lla> = (0..n * n)
        .map(|i| {
            let x = (i / n) as f64;
            let y = (i % n) as f64;
            Lla::new(100.0 + x * 0.01, 30.0 + y * 0.01, 0.0)
        })
        .collect();
    let mut grid = Grid::new(5.0);
    grid.init(&data).unwrap();
    for y in 0..n {
        if y != gap_lat {
            grid.altitude[wall_lon][y] = 100.0;
        }
    }
    grid
}

#[test]
fn plans_through_a_gap_in_a_wall() {
    let grid = grid_with_wall(10, 5, 7);
    let mut astar = AStar::from_grid(grid);
    astar.set_start_idx((0, 0));
    astar.set_end_idx((9, 9));
    let (path, ok) = astar.search();
    assert!(ok);
    assert_eq!(path.first().unwrap().lon, 100.0);
}

#[test]
fn relocates_an_out_of_grid_terminus_to_the_nearest_edge_cell() {
    let data: Vec<Lla> = (0..64)
        .map(|i| {
            let x = (i / 8) as f64;
            let y = (i % 8) as f64;
            Lla::new(100.0 + x * 0.01, 30.0 + y * 0.01, 0.0)
        })
        .collect();
    let mut grid = Grid::new(5.0);
    grid.init(&data).unwrap();
    let astar = AStar::from_grid(grid);

    let origin = Lla::new(100.0, 30.0, 0.0);
    let terminus = Lla::new(101.0, 30.7, 0.0); // far east of the grid
    let (idx, flag) = astar.terminal_reset(&origin, &terminus, false);
    assert!(flag);
    assert_eq!(idx.0, astar.grid.num_lon - 1);
    assert!(astar.grid.moveable(idx));
}

#[test]
fn terminal_bound_candidates_are_all_moveable() {
    let grid = grid_with_wall(10, 5, 7);
    let astar = AStar::from_grid(grid);
    let origin = Lla::new(100.0, 30.0, 0.0);
    let terminus = Lla::new(200.0, 30.09, 0.0);
    let bounds = astar.get_terminal_bound(&origin, &terminus);
    assert!(!bounds.is_empty());
    for pos in bounds {
        assert!(astar.grid.moveable(pos));
    }
}
