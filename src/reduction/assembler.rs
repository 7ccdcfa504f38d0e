//! Global matrix assembly in node space

use std::time::Instant;

use log::debug;
use nalgebra_sparse::CscMatrix;

use crate::elements::{Element, MatrixKind, Node};
use crate::error::{FEAError, FEAResult};
use crate::math::SparseMatrixBuilder;
use crate::model::Model;

/// Assemble the `6n x 6n` global matrix of `kind` for every element of `model`
pub fn assemble_global_matrix(model: &Model, kind: MatrixKind) -> FEAResult<CscMatrix<f64>> {
    assemble(model.nodes(), model.elements(), kind)
}

pub fn assemble(
    nodes: &[Node],
    elements: &[Box<dyn Element>],
    kind: MatrixKind,
) -> FEAResult<CscMatrix<f64>> {
    let start = Instant::now();
    let size = 6 * nodes.len();
    let mut builder = SparseMatrixBuilder::square(size);

    for element in elements {
        let dofs = scatter_map(element.as_ref(), nodes.len())?;
        let matrix = element.global_matrix(kind, nodes)?;
        if matrix.nrows() != dofs.len() || matrix.ncols() != dofs.len() {
            return Err(FEAError::dimension(
                "element matrix",
                dofs.len(),
                matrix.nrows().max(matrix.ncols()),
            ));
        }
        builder.add_dense(&dofs, &matrix);
    }

    let global = builder.to_csc()?;
    debug!(
        "assembled {} matrix: {}x{}, {} triplets -> {} nonzeros in {:.2?}",
        kind.name(),
        size,
        size,
        builder.nnz(),
        global.nnz(),
        start.elapsed()
    );
    Ok(global)
}

/// Node-space DOF of every local DOF of `element`
fn scatter_map(element: &dyn Element, node_count: usize) -> FEAResult<Vec<usize>> {
    let mut dofs = Vec::with_capacity(6 * element.nodes().len());
    for &node in element.nodes() {
        if node >= node_count {
            return Err(FEAError::NodeNotFound(format!("#{node}")));
        }
        dofs.extend((0..6).map(|k| 6 * node + k));
    }
    Ok(dofs)
}
