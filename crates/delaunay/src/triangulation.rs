//! Incremental Delaunay tetrahedralisation
//!
//! Points are inserted one at a time (Bowyer-Watson). For each new point the
//! cavity of tetrahedra whose circumsphere contains it is removed and
//! re-filled by connecting the point to the cavity boundary.
//!
//! The hull is closed off by ghost cells, each joining a hull face to a
//! single vertex at infinity. A ghost conflicts with a new point when the
//! point sees its hull face from outside, so points beyond the current hull
//! extend it exactly and the final triangulation always fills the convex
//! hull. Ghosts are dropped once every point is in.
//!
//! Regular source grids are full of cospherical and coplanar points, so the
//! cavity test is inclusive and the cavity is grown until every boundary face
//! is strictly visible from the new point. This keeps every new tetrahedron
//! at positive volume without needing exact arithmetic.

// standard library
use std::collections::{HashMap, HashSet};

// crate modules
use crate::error::{Error, Result};
use crate::locate::{BucketGrid, Location};
use crate::order::morton_order;
use crate::predicates::{barycentric, normalised_orient3d, orient3d, Sphere};

// thermofit modules
use thermofit_utils::{f, Bounds, Error as UtilsError};

// external crates
use log::{debug, trace};
use nalgebra::Vector3;

/// Barycentric slack used by [Triangulation::locate()]
pub const DEFAULT_TOLERANCE: f64 = 1.0e-9;

/// Local vertex indices of the face opposite each vertex
const FACES: [[usize; 3]; 4] = [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]];

/// Relative slack on r² for the inclusive circumsphere test
const SPHERE_TOLERANCE: f64 = 1.0e-12;

/// Minimum normalised orientation for a face to count as visible
const VISIBILITY_TOLERANCE: f64 = 1.0e-10;

/// Points closer than this fraction of the cloud size are duplicates
const DUPLICATE_TOLERANCE: f64 = 1.0e-12;

/// Relative thickness below which a cloud is considered flat
const DEGENERATE_TOLERANCE: f64 = 1.0e-10;

/// Delaunay tetrahedralisation of a 3-D point cloud
///
/// The triangulation only references the input points by index, so the
/// tetrahedra map directly back onto whatever values are associated with the
/// original points.
///
/// ```rust
/// # use thermofit_delaunay::{Location, Triangulation};
/// let points = [
///     [0.0, 0.0, 0.0],
///     [1.0, 0.0, 0.0],
///     [0.0, 1.0, 0.0],
///     [0.0, 0.0, 1.0],
///     [1.0, 1.0, 1.0],
/// ];
///
/// let triangulation = Triangulation::new(&points).unwrap();
///
/// // Locate a point and get the weights of each vertex
/// let p = [0.2, 0.3, 0.1];
/// if let Location::Found(t) = triangulation.locate(&p) {
///     let weights = triangulation.barycentric(t, &p).unwrap();
///     assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Triangulation {
    points: Vec<[f64; 3]>,
    tetrahedra: Vec<[usize; 4]>,
    neighbours: Vec<[Option<usize>; 4]>,
    grid: BucketGrid,
}

impl Triangulation {
    /// Build the Delaunay tetrahedralisation of `points`
    ///
    /// Fails with [Error::DegenerateInput] for fewer than 4 points, or points
    /// that do not span a volume (coincident, collinear, coplanar), and if a
    /// point can not be inserted cleanly through rounding. Exact duplicates
    /// are skipped, the first occurrence is the one used.
    pub fn new(points: &[[f64; 3]]) -> Result<Self> {
        if points.len() < 4 {
            return Err(Error::DegenerateInput(f!(
                "at least 4 points are required, found {}",
                points.len()
            )));
        }

        let bounds = Bounds::from_points(points).map_err(|e| match e {
            UtilsError::NonFiniteCoordinate { index } => Error::NonFiniteCoordinate { index },
            other => Error::DegenerateInput(other.to_string()),
        })?;
        let seed = initial_tetrahedron(points, &bounds)?;

        debug!("Triangulating {} points within {bounds}", points.len());
        let mut builder = Builder::new(points, seed, &bounds);

        let mut hint = 0;
        let mut skipped = 0;
        for index in morton_order(points, &bounds) {
            if seed.contains(&index) {
                continue;
            }
            match builder.insert(index, hint)? {
                Some(cell) => hint = cell,
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("{skipped} duplicate point(s) were not inserted");
        }

        let (tetrahedra, neighbours) = builder.finish();
        if tetrahedra.is_empty() {
            return Err(Error::DegenerateInput(
                "no tetrahedra could be formed".to_string(),
            ));
        }

        debug!("Generated {} tetrahedra", tetrahedra.len());
        let grid = BucketGrid::new(points, &tetrahedra, &bounds);

        Ok(Self {
            points: points.to_vec(),
            tetrahedra,
            neighbours,
            grid,
        })
    }

    /// Input points, in the original order
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Point indices of every tetrahedron
    pub fn tetrahedra(&self) -> &[[usize; 4]] {
        &self.tetrahedra
    }

    /// Adjacent tetrahedron across the face opposite each vertex
    ///
    /// `None` for faces on the hull.
    pub fn neighbours(&self) -> &[[Option<usize>; 4]] {
        &self.neighbours
    }

    /// Point indices of a single tetrahedron
    pub fn tetrahedron(&self, index: usize) -> Option<[usize; 4]> {
        self.tetrahedra.get(index).copied()
    }

    /// Number of tetrahedra
    pub fn len(&self) -> usize {
        self.tetrahedra.len()
    }

    /// True if there are no tetrahedra, which `new()` never allows
    pub fn is_empty(&self) -> bool {
        self.tetrahedra.is_empty()
    }

    /// Total volume of all tetrahedra
    pub fn volume(&self) -> f64 {
        self.tetrahedra
            .iter()
            .map(|tet| {
                let [a, b, c, d] = tet.map(|v| Vector3::from(self.points[v]));
                orient3d(&a, &b, &c, &d).abs() / 6.0
            })
            .sum()
    }

    /// Find the tetrahedron containing `point`
    ///
    /// Uses [DEFAULT_TOLERANCE] as the slack on barycentric coordinates. See
    /// [locate_with_tolerance()](Triangulation::locate_with_tolerance).
    pub fn locate(&self, point: &[f64; 3]) -> Location {
        self.locate_with_tolerance(point, DEFAULT_TOLERANCE)
    }

    /// Find the tetrahedron containing `point`, allowing for rounding
    ///
    /// A point is inside a tetrahedron if none of its barycentric coordinates
    /// are below `-tolerance`. Points shared by several tetrahedra (on faces,
    /// edges, vertices) return the first candidate found.
    pub fn locate_with_tolerance(&self, point: &[f64; 3], tolerance: f64) -> Location {
        let slack = tolerance * self.grid.scale();
        for &t in self.grid.candidates(point, slack) {
            if let Some(weights) = self.barycentric(t, point) {
                if weights.iter().all(|w| *w >= -tolerance) {
                    return Location::Found(t);
                }
            }
        }

        trace!("No tetrahedron found for {point:?}");
        Location::NotFound
    }

    /// Barycentric coordinates of `point` relative to a tetrahedron
    ///
    /// Weights are ordered as the tetrahedron vertices. `None` if the index
    /// is out of range or the tetrahedron is singular.
    pub fn barycentric(&self, tetrahedron: usize, point: &[f64; 3]) -> Option<[f64; 4]> {
        let tet = self.tetrahedra.get(tetrahedron)?;
        let [p0, p1, p2, p3] = tet.map(|v| Vector3::from(self.points[v]));
        barycentric(&p0, &p1, &p2, &p3, &Vector3::from(*point))
    }
}

/// Pick four points spanning a volume to start from
///
/// Also the check that the cloud is not coincident, collinear or coplanar.
/// Ties go to the lowest index, so exact duplicates never displace the first
/// occurrence.
fn initial_tetrahedron(points: &[[f64; 3]], bounds: &Bounds) -> Result<[usize; 4]> {
    let scale = bounds.max_extent();
    if scale == 0.0 {
        return Err(Error::DegenerateInput(
            "all points are coincident".to_string(),
        ));
    }

    let vectors = points
        .iter()
        .map(|p| Vector3::from(*p))
        .collect::<Vec<Vector3<f64>>>();
    let origin = vectors[0];

    // furthest point from the first gives a reliable axis
    let far = furthest(vectors.iter().map(|v| (v - origin).norm()));
    let axis = vectors[far] - origin;

    // furthest point from that axis
    let side = furthest(vectors.iter().map(|v| axis.cross(&(v - origin)).norm()));
    let normal = axis.cross(&(vectors[side] - origin));

    if normal.norm() <= DEGENERATE_TOLERANCE * axis.norm() * scale {
        return Err(Error::DegenerateInput("points are collinear".to_string()));
    }

    // furthest point from the plane
    let normal = normal.normalize();
    let top = furthest(vectors.iter().map(|v| normal.dot(&(v - origin)).abs()));
    let thickness = normal.dot(&(vectors[top] - origin)).abs();

    if thickness <= DEGENERATE_TOLERANCE * scale {
        return Err(Error::DegenerateInput("points are coplanar".to_string()));
    }

    Ok([0, far, side, top])
}

/// Index of the first largest value
fn furthest<I: Iterator<Item = f64>>(values: I) -> usize {
    values
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, value)| {
            if value > best.1 {
                (i, value)
            } else {
                best
            }
        })
        .0
}

/// Working tetrahedron during construction
#[derive(Debug, Clone)]
struct Cell {
    vertices: [usize; 4],
    neighbours: [Option<usize>; 4],
    sphere: Option<Sphere>,
    alive: bool,
}

impl Cell {
    /// Local position of the vertex at infinity, if this is a ghost
    fn infinite_position(&self, infinite: usize) -> Option<usize> {
        self.vertices.iter().position(|v| *v == infinite)
    }
}

/// Mutable state for the incremental construction
///
/// The vertex at infinity has index `infinite`, one past the real points, and
/// no coordinates. Every cell is kept positively oriented, where a ghost
/// counts as positive if swapping its infinite vertex for any point beyond
/// the hull face gives a positive volume. Every cell always has four
/// neighbours.
#[derive(Debug)]
struct Builder {
    points: Vec<Vector3<f64>>,
    cells: Vec<Cell>,
    free: Vec<usize>,
    infinite: usize,
    scale: f64,
}

impl Builder {
    fn new(points: &[[f64; 3]], seed: [usize; 4], bounds: &Bounds) -> Self {
        let mut builder = Self {
            points: points.iter().map(|p| Vector3::from(*p)).collect(),
            cells: Vec::with_capacity(8 * points.len()),
            free: Vec::new(),
            infinite: points.len(),
            scale: bounds.max_extent(),
        };

        let mut first = seed;
        let [a, b, c, d] = first.map(|v| builder.points[v]);
        if orient3d(&a, &b, &c, &d) < 0.0 {
            first.swap(2, 3);
        }

        // one ghost on each face, flipped so the hull face points outwards
        let mut created = vec![builder.push_cell(first, [None; 4])];
        for (i, face) in FACES.iter().enumerate() {
            let mut ghost = first;
            ghost[i] = builder.infinite;
            ghost.swap(face[0], face[1]);
            created.push(builder.push_cell(ghost, [None; 4]));
        }

        builder.link(&created);
        builder
    }

    /// Join cells that share a face
    fn link(&mut self, created: &[usize]) {
        let mut open: HashMap<[usize; 3], (usize, usize)> = HashMap::new();

        for &cell in created {
            for (i, face) in FACES.iter().enumerate() {
                let mut key = face.map(|local| self.cells[cell].vertices[local]);
                key.sort_unstable();

                match open.remove(&key) {
                    Some((other, j)) => {
                        self.cells[cell].neighbours[i] = Some(other);
                        self.cells[other].neighbours[j] = Some(cell);
                    }
                    None => {
                        open.insert(key, (cell, i));
                    }
                }
            }
        }
    }

    /// Insert a point, returning a new cell to start the next walk from
    ///
    /// `None` if the point duplicates an existing vertex.
    fn insert(&mut self, index: usize, hint: usize) -> Result<Option<usize>> {
        let p = self.points[index];

        let start = self
            .walk(hint, &p)
            .or_else(|| self.scan(&p))
            .ok_or_else(|| {
                Error::DegenerateInput(f!("unable to locate point {index} during triangulation"))
            })?;

        let conflicts = self.conflicts(start, &p);
        if self.touches_vertex(&conflicts, &p) {
            debug!("Point {index} duplicates an existing vertex, skipping");
            return Ok(None);
        }

        let cavity = self.grow(conflicts, &p).ok_or_else(|| {
            Error::DegenerateInput(f!("unable to form a valid cavity for point {index}"))
        })?;

        trace!("Point {index} replaces {} cell(s)", cavity.len());
        self.fill_cavity(&cavity, index).map(Some)
    }

    /// Visibility walk towards a cell in conflict with `p`
    ///
    /// Ends in the real cell containing `p`, or a ghost whose hull face `p`
    /// is strictly beyond.
    fn walk(&self, start: usize, p: &Vector3<f64>) -> Option<usize> {
        let mut current = start;
        let max_steps = self.cells.len() + 16;

        for step in 0..max_steps {
            let cell = &self.cells[current];
            if !cell.alive {
                return None;
            }

            if let Some(k) = cell.infinite_position(self.infinite) {
                if self.side(cell, k, p) > 0.0 {
                    return Some(current);
                }
                current = cell.neighbours[k]?;
                continue;
            }

            // rotate the first face tested so the walk can not cycle forever
            let crossing = (0..4)
                .map(|k| (k + step) % 4)
                .find(|&i| self.side(cell, i, p) < 0.0);

            match crossing {
                None => return Some(current),
                Some(i) => current = cell.neighbours[i]?,
            }
        }

        None
    }

    /// Exhaustive search, only used if the walk fails
    fn scan(&self, p: &Vector3<f64>) -> Option<usize> {
        self.cells.iter().position(|cell| {
            cell.alive
                && match cell.infinite_position(self.infinite) {
                    Some(k) => self.side(cell, k, p) > 0.0,
                    None => (0..4).all(|i| self.side(cell, i, p) >= 0.0),
                }
        })
    }

    /// Normalised orientation of `cell` with vertex `i` swapped for `p`
    ///
    /// Positive when `p` is on the same side of face `i` as the vertex it
    /// replaces. Face `i` must not hold the vertex at infinity. The face is
    /// always evaluated with its vertices in sorted order, so the cells
    /// either side of a shared face agree exactly on the result.
    fn side(&self, cell: &Cell, i: usize, p: &Vector3<f64>) -> f64 {
        let mut order = cell.vertices;
        order[i] = usize::MAX;
        let inversions = (0..4)
            .flat_map(|a| (a + 1..4).map(move |b| (a, b)))
            .filter(|(a, b)| order[*a] > order[*b])
            .count();

        let mut face = FACES[i].map(|local| cell.vertices[local]);
        face.sort_unstable();
        let [a, b, c] = face.map(|v| &self.points[v]);

        let orientation = normalised_orient3d(a, b, c, p);
        if inversions % 2 == 0 {
            orientation
        } else {
            -orientation
        }
    }

    /// True if `cell` has to be removed to make room for `p`
    ///
    /// Real cells conflict when their circumsphere contains `p`. Ghosts
    /// conflict when `p` is strictly beyond the hull face, or close enough to
    /// its plane that the real cell behind the face decides.
    fn in_conflict(&self, cell: usize, p: &Vector3<f64>) -> bool {
        let current = &self.cells[cell];
        match current.infinite_position(self.infinite) {
            None => match &current.sphere {
                Some(sphere) => sphere.contains(p, SPHERE_TOLERANCE),
                // flat cells should never survive, so get rid of them
                None => true,
            },
            Some(k) => {
                let beyond = self.side(current, k, p);
                beyond > VISIBILITY_TOLERANCE
                    || (beyond >= -VISIBILITY_TOLERANCE
                        && current.neighbours[k].is_some_and(|n| self.in_conflict(n, p)))
            }
        }
    }

    /// Flood fill from `start` through every neighbour in conflict with `p`
    fn conflicts(&self, start: usize, p: &Vector3<f64>) -> Vec<usize> {
        let mut members = vec![start];
        let mut inside = HashSet::from([start]);
        let mut checked = HashSet::new();
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            for neighbour in self.cells[current].neighbours.iter().flatten() {
                if inside.contains(neighbour) || !checked.insert(*neighbour) {
                    continue;
                }
                if self.in_conflict(*neighbour, p) {
                    inside.insert(*neighbour);
                    members.push(*neighbour);
                    stack.push(*neighbour);
                }
            }
        }

        members
    }

    fn touches_vertex(&self, cells: &[usize], p: &Vector3<f64>) -> bool {
        let limit = DUPLICATE_TOLERANCE * self.scale;
        cells
            .iter()
            .flat_map(|c| self.cells[*c].vertices)
            .filter(|v| *v != self.infinite)
            .any(|v| (self.points[v] - p).norm() <= limit)
    }

    /// Grow the cavity until `p` sees every boundary face
    ///
    /// `None` if the cavity would swallow the whole triangulation.
    fn grow(&self, mut members: Vec<usize>, p: &Vector3<f64>) -> Option<Vec<usize>> {
        let mut inside = members.iter().copied().collect::<HashSet<usize>>();

        loop {
            let mut grown = Vec::new();
            for &member in &members {
                let cell = &self.cells[member];
                for i in 0..4 {
                    let neighbour = cell.neighbours[i]?;
                    if inside.contains(&neighbour) {
                        continue;
                    }
                    if !self.is_valid_boundary(cell, i, neighbour, p) {
                        grown.push(neighbour);
                    }
                }
            }

            if grown.is_empty() {
                return Some(members);
            }

            for cell in grown {
                if inside.insert(cell) {
                    members.push(cell);
                }
            }

            if members.len() + self.free.len() >= self.cells.len() {
                return None;
            }
        }
    }

    /// True if face `i` of a cavity cell can be joined to `p`
    ///
    /// Real faces need a new tetrahedron of positive volume. Faces through
    /// the vertex at infinity become a new ghost, which needs a proper hull
    /// triangle and must not leave `p` in conflict with the ghost next door.
    fn is_valid_boundary(&self, cell: &Cell, i: usize, neighbour: usize, p: &Vector3<f64>) -> bool {
        let mut remaining = (0..4)
            .filter(|k| *k != i)
            .map(|k| cell.vertices[k])
            .filter(|v| *v != self.infinite);

        let (Some(a), Some(b), None) = (remaining.next(), remaining.next(), remaining.next())
        else {
            return self.side(cell, i, p) > VISIBILITY_TOLERANCE;
        };

        let (edge, to_p) = (self.points[b] - self.points[a], p - self.points[a]);
        let scale = edge.norm() * to_p.norm();
        scale > 0.0
            && edge.cross(&to_p).norm() / scale > VISIBILITY_TOLERANCE
            && !self.in_conflict(neighbour, p)
    }

    /// Replace the cavity with cells joining its boundary to the new point
    ///
    /// Each boundary face keeps the cavity cell it came from with the
    /// opposite vertex swapped for the new point, so orientation carries
    /// over.
    fn fill_cavity(&mut self, cavity: &[usize], index: usize) -> Result<usize> {
        let inside = cavity.iter().copied().collect::<HashSet<usize>>();

        let mut boundary = Vec::new();
        for &member in cavity {
            let cell = &self.cells[member];
            for i in 0..4 {
                match cell.neighbours[i] {
                    Some(n) if inside.contains(&n) => continue,
                    Some(n) => {
                        let mut vertices = cell.vertices;
                        vertices[i] = index;
                        boundary.push((vertices, i, n));
                    }
                    None => {
                        return Err(Error::DegenerateInput(f!(
                            "cavity for point {index} reached an open face"
                        )))
                    }
                }
            }
        }

        for &member in cavity {
            self.cells[member].alive = false;
            self.free.push(member);
        }

        // new cells share faces across the edges of the cavity boundary
        let mut open_edges: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
        let mut closed_edges = HashSet::new();
        let mut last = None;

        for (vertices, i, outside) in boundary {
            let mut neighbours = [None; 4];
            neighbours[i] = Some(outside);
            let new = self.push_cell(vertices, neighbours);

            let face = FACES[i].map(|local| vertices[local]);
            let shared = self.cells[outside]
                .vertices
                .iter()
                .position(|v| !face.contains(v));
            if let Some(j) = shared {
                self.cells[outside].neighbours[j] = Some(new);
            }

            // every other face holds the new point plus one boundary edge
            for j in (0..4).filter(|j| *j != i) {
                let edge = (0..4)
                    .filter(|k| *k != i && *k != j)
                    .map(|k| vertices[k])
                    .collect::<Vec<usize>>();
                let key = (edge[0].min(edge[1]), edge[0].max(edge[1]));

                if closed_edges.contains(&key) {
                    return Err(Error::DegenerateInput(f!(
                        "cavity boundary for point {index} is not a closed surface"
                    )));
                }

                match open_edges.remove(&key) {
                    Some((other, k)) => {
                        self.cells[new].neighbours[j] = Some(other);
                        self.cells[other].neighbours[k] = Some(new);
                        closed_edges.insert(key);
                    }
                    None => {
                        open_edges.insert(key, (new, j));
                    }
                }
            }

            last = Some(new);
        }

        if !open_edges.is_empty() {
            return Err(Error::DegenerateInput(f!(
                "cavity boundary for point {index} left {} unmatched edge(s)",
                open_edges.len()
            )));
        }

        last.ok_or_else(|| Error::DegenerateInput(f!("empty cavity for point {index}")))
    }

    fn push_cell(&mut self, vertices: [usize; 4], neighbours: [Option<usize>; 4]) -> usize {
        let sphere = if vertices.contains(&self.infinite) {
            None
        } else {
            let [a, b, c, d] = vertices.map(|v| self.points[v]);
            Sphere::circumscribe(&a, &b, &c, &d)
        };

        let cell = Cell {
            vertices,
            neighbours,
            sphere,
            alive: true,
        };

        match self.free.pop() {
            Some(slot) => {
                self.cells[slot] = cell;
                slot
            }
            None => {
                self.cells.push(cell);
                self.cells.len() - 1
            }
        }
    }

    /// Drop dead cells and ghosts and renumber what is left
    fn finish(self) -> (Vec<[usize; 4]>, Vec<[Option<usize>; 4]>) {
        let mut remap = vec![None; self.cells.len()];
        let mut tetrahedra = Vec::new();

        for (i, cell) in self.cells.iter().enumerate() {
            if cell.alive && cell.infinite_position(self.infinite).is_none() {
                remap[i] = Some(tetrahedra.len());
                tetrahedra.push(cell.vertices);
            }
        }

        let neighbours = self
            .cells
            .iter()
            .enumerate()
            .filter(|(i, _)| remap[*i].is_some())
            .map(|(_, cell)| cell.neighbours.map(|n| n.and_then(|n| remap[n])))
            .collect();

        (tetrahedra, neighbours)
    }
}
