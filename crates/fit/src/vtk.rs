//! Conversion of fitted data to VTK for plotting
//!
//! Mostly for checking results by eye in Paraview or Visit. The fitted
//! records become a cloud of vertex cells, and a source triangulation can be
//! written as tetrahedral cells to see exactly what was interpolated.

// standard library
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::record::FitRecord;

// thermofit modules
use thermofit_delaunay::Triangulation;
use thermofit_utils::f;

// external crates
use log::debug;
use vtkio::model::{
    Attribute, Attributes, ByteOrder, CellType, Cells, DataArray, DataSet, ElementType, IOBuffer,
    UnstructuredGridPiece, Version, VertexNumbers, Vtk,
};

/// Output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VtkFormat {
    /// Unstructured grid XML format, use a `.vtu` extension
    #[default]
    Xml,
    /// Legacy text format
    LegacyAscii,
    /// Legacy big endian binary format
    LegacyBinary,
}

impl std::fmt::Display for VtkFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            VtkFormat::Xml => write!(f, "xml"),
            VtkFormat::LegacyAscii => write!(f, "legacy ascii"),
            VtkFormat::LegacyBinary => write!(f, "legacy binary"),
        }
    }
}

/// Convert fitted records to a cloud of vertex cells
///
/// Point data include the fitted `value` and an `extrapolated` flag (1.0 for
/// targets that used the nearest-neighbour fallback, 0.0 otherwise) so the
/// boundary shell is easy to pick out.
///
/// ```rust
/// # use thermofit_fit::{records_to_vtk, FitRecord, Method};
/// let records = vec![FitRecord {
///     index: 1,
///     id: 1,
///     x: 0.0,
///     y: 0.0,
///     z: 0.0,
///     value: 1.0,
///     method: Method::Interpolated,
/// }];
///
/// let vtk = records_to_vtk(&records);
/// assert_eq!(vtk.title, "Fitted values");
/// ```
pub fn records_to_vtk(records: &[FitRecord]) -> Vtk {
    let points = records
        .iter()
        .flat_map(|r| r.coords())
        .collect::<Vec<f64>>();

    let n = records.len() as u64;
    let cells = Cells {
        cell_verts: VertexNumbers::XML {
            connectivity: (0..n).collect(),
            offsets: (1..=n).collect(),
        },
        types: vec![CellType::Vertex; records.len()],
    };

    let mut attributes = Attributes::new();
    attributes.point.push(scalar_array(
        "value",
        records.iter().map(|r| r.value).collect(),
    ));
    attributes.point.push(scalar_array(
        "extrapolated",
        records
            .iter()
            .map(|r| if r.is_extrapolated() { 1.0 } else { 0.0 })
            .collect(),
    ));

    unstructured_vtk("Fitted values".to_string(), points, cells, attributes)
}

/// Convert a source triangulation to tetrahedral cells
///
/// `values` are attached as point data and must have one entry per point of
/// the triangulation.
pub fn triangulation_to_vtk(triangulation: &Triangulation, values: &[f64]) -> Result<Vtk> {
    let n_points = triangulation.points().len();
    if values.len() != n_points {
        return Err(Error::ShapeMismatch {
            what: "triangulation point values",
            expected: n_points,
            found: values.len(),
        });
    }

    let points = triangulation
        .points()
        .iter()
        .flatten()
        .copied()
        .collect::<Vec<f64>>();

    let connectivity = triangulation
        .tetrahedra()
        .iter()
        .flatten()
        .map(|v| *v as u64)
        .collect::<Vec<u64>>();

    let n_cells = triangulation.len() as u64;
    let cells = Cells {
        cell_verts: VertexNumbers::XML {
            connectivity,
            offsets: (1..=n_cells).map(|i| 4 * i).collect(),
        },
        types: vec![CellType::Tetra; triangulation.len()],
    };

    let mut attributes = Attributes::new();
    attributes
        .point
        .push(scalar_array("value", values.to_vec()));

    let title = f!("Source triangulation ({} tetrahedra)", triangulation.len());
    Ok(unstructured_vtk(title, points, cells, attributes))
}

/// Write any Vtk object to the chosen format
///
/// ```rust, no_run
/// # use thermofit_fit::{records_to_vtk, write_vtk, VtkFormat};
/// let vtk = records_to_vtk(&[]);
/// write_vtk(vtk, "./fitted.vtk", VtkFormat::LegacyAscii).unwrap();
/// ```
pub fn write_vtk<P: AsRef<Path>>(vtk: Vtk, path: P, format: VtkFormat) -> Result<()> {
    debug!("Writing \"{}\" as {format}", vtk.title);
    match format {
        VtkFormat::Xml => vtk.export(path)?,
        VtkFormat::LegacyAscii => vtk.export_ascii(path)?,
        VtkFormat::LegacyBinary => vtk.export_be(path)?,
    }
    Ok(())
}

fn scalar_array(name: &str, data: Vec<f64>) -> Attribute {
    Attribute::DataArray(DataArray {
        name: name.to_string(),
        elem: ElementType::Scalars {
            num_comp: 1,
            lookup_table: None,
        },
        data: IOBuffer::F64(data),
    })
}

fn unstructured_vtk(title: String, points: Vec<f64>, cells: Cells, data: Attributes) -> Vtk {
    Vtk {
        version: Version::Auto,
        title,
        byte_order: ByteOrder::BigEndian,
        file_path: None,
        data: DataSet::inline(UnstructuredGridPiece {
            points: points.into(),
            cells,
            data,
        }),
    }
}
