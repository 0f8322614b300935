//! Recursive split-radix decomposition.
//!
//! A size-`n` DFT is one size-`n/2` DFT of the even samples plus two size-`n/4`
//! DFTs of the odd subsequences `x[4j + 1]` and `x[4j + 3]`, combined with the
//! twiddles `W^k` and `W^3k` (Sorensen, Heideman and Burrus, "On Computing the
//! Split-Radix FFT", IEEE Trans. ASSP-34, 1986).
//!
//! The tree is wired once at construction.  Every node knows where its input
//! subsequence lives in the flat sequence arrays (offset and stride) and where
//! its output goes in the flat transform arrays, so evaluation performs no
//! address arithmetic beyond walking the precomputed fields and needs no
//! bit-reversal pass.  The price is that input and output must be distinct
//! buffers.
//!
//! Output layout of a node at transform offset `o`:
//!
//! ```text
//! [o, o + n/2)          half-size transform of the even samples
//! [o + n/2, o + 3n/4)   quarter-size transform of x[4j + 1]
//! [o + 3n/4, o + n)     quarter-size transform of x[4j + 3]
//! ```
//!
//! The butterflies then overwrite this region in place with the size-`n`
//! transform in natural order.

use crate::error::{DspError, DspResult};
use crate::float::DftFloat;
use crate::kernels::{butterfly, rotate, Base16, Base8, Sink, Source};
use crate::twiddle::TwiddleTable;

/// One node of the transform tree.
#[derive(Clone, Debug)]
pub(crate) enum Node {
    Base8(Base8),
    Base16(Base16),
    Generic(Box<GenericNode>),
}

impl Node {
    /// Build the subtree for a transform of size `2^log2n`.
    ///
    /// `table_stride` is the ratio between the size the twiddle tables were built
    /// for and this node's size.
    pub(crate) fn build(
        log2n: u32,
        x_offset: usize,
        x_stride: usize,
        y_offset: usize,
        table_stride: usize,
    ) -> DspResult<Self> {
        match log2n {
            0..=2 => Err(DspError::InvalidTransformOrder { log2n }),
            3 => Ok(Node::Base8(Base8::new(x_offset, x_stride, y_offset))),
            4 => Ok(Node::Base16(Base16::new(x_offset, x_stride, y_offset))),
            _ => Ok(Node::Generic(Box::new(GenericNode::new(
                log2n,
                x_offset,
                x_stride,
                y_offset,
                table_stride,
            )?))),
        }
    }

    /// Transform size handled by this node.
    pub(crate) fn size(&self) -> usize {
        match self {
            Node::Base8(_) => 8,
            Node::Base16(_) => 16,
            Node::Generic(node) => node.size,
        }
    }

    /// Number of nodes in the subtree, leaves included.
    pub(crate) fn node_count(&self) -> usize {
        match self {
            Node::Base8(_) | Node::Base16(_) => 1,
            Node::Generic(node) => {
                1 + node.half.node_count() + node.odd1.node_count() + node.odd3.node_count()
            }
        }
    }

    #[inline]
    pub(crate) fn evaluate<T: DftFloat>(
        &self,
        table: &TwiddleTable<T>,
        x: &Source<'_, T>,
        y: &mut Sink<'_, T>,
    ) {
        match self {
            Node::Base8(kernel) => kernel.evaluate(x, y),
            Node::Base16(kernel) => kernel.evaluate(x, y),
            Node::Generic(node) => node.evaluate(table, x, y),
        }
    }
}

/// Split-radix node for sizes of 32 and above.
#[derive(Clone, Debug)]
pub(crate) struct GenericNode {
    size: usize,
    n4: usize,
    n8: usize,
    table_stride: usize,

    /// Transform offsets of the four butterfly legs at `k = 0`.
    a0: usize,
    b0: usize,
    c0: usize,
    d0: usize,

    half: Node,
    odd1: Node,
    odd3: Node,
}

impl GenericNode {
    fn new(
        log2n: u32,
        x_offset: usize,
        x_stride: usize,
        y_offset: usize,
        table_stride: usize,
    ) -> DspResult<Self> {
        let size = 1usize << log2n;
        let n2 = size / 2;
        let n4 = size / 4;

        let half = Node::build(log2n - 1, x_offset, 2 * x_stride, y_offset, 2 * table_stride)?;
        let odd1 = Node::build(
            log2n - 2,
            x_offset + x_stride,
            4 * x_stride,
            y_offset + n2,
            4 * table_stride,
        )?;
        let odd3 = Node::build(
            log2n - 2,
            x_offset + 3 * x_stride,
            4 * x_stride,
            y_offset + n2 + n4,
            4 * table_stride,
        )?;

        Ok(Self {
            size,
            n4,
            n8: size / 8,
            table_stride,
            a0: y_offset,
            b0: y_offset + n4,
            c0: y_offset + n2,
            d0: y_offset + n2 + n4,
            half,
            odd1,
            odd3,
        })
    }

    fn evaluate<T: DftFloat>(&self, table: &TwiddleTable<T>, x: &Source<'_, T>, y: &mut Sink<'_, T>) {
        self.half.evaluate(table, x, y);
        self.odd1.evaluate(table, x, y);
        self.odd3.evaluate(table, x, y);

        let (a0, b0, c0, d0) = (self.a0, self.b0, self.c0, self.d0);
        let ts = self.table_stride;

        // k = 0
        let t1 = (y.re[c0], y.im[c0]);
        let t3 = (y.re[d0], y.im[d0]);
        butterfly(y, a0, b0, c0, d0, t1, t3);

        // 0 < k < n/8: twiddles straight from the tables
        let mut t = ts;
        for k in 1..self.n8 {
            let (c, d) = (c0 + k, d0 + k);
            let t1 = rotate(table.c[t], table.s[t], y.re[c], y.im[c]);
            let t3 = rotate(table.c3[t], table.s3[t], y.re[d], y.im[d]);
            butterfly(y, a0 + k, b0 + k, c, d, t1, t3);
            t += ts;
        }

        // k = n/8: W = √2/2 (1 - i), W^3 = √2/2 (-1 - i)
        let h = T::FRAC_1_SQRT_2();
        let k = self.n8;
        let (c, d) = (c0 + k, d0 + k);
        let t1 = (h * (y.re[c] + y.im[c]), h * (y.im[c] - y.re[c]));
        let t3 = (h * (y.im[d] - y.re[d]), -h * (y.im[d] + y.re[d]));
        butterfly(y, a0 + k, b0 + k, c, d, t1, t3);

        // n/8 < k < n/4: with j = n/4 - k,
        //   W^k  = -sin(2πj/n) - i cos(2πj/n) = (-s[j], -c[j])
        //   W^3k = -sin(6πj/n) + i cos(6πj/n) = ( s3[j], c3[j])
        let mut t = (self.n8 - 1) * ts;
        for k in self.n8 + 1..self.n4 {
            let (c, d) = (c0 + k, d0 + k);
            let t1 = rotate(-table.s[t], -table.c[t], y.re[c], y.im[c]);
            let t3 = rotate(table.s3[t], table.c3[t], y.re[d], y.im[d]);
            butterfly(y, a0 + k, b0 + k, c, d, t1, t3);
            t -= ts;
        }
    }
}
