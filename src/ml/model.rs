use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

/// Number of output classes: 0 = failed, 1 = successful.
pub const NUM_CLASSES: usize = 2;

#[derive(Config, Debug)]
pub struct EmbeddingClassifierConfig {
    /// Rows in the embedding table: vocabulary cap + 1 (index 0 is padding)
    pub vocab_size: usize,
    /// Width of every encoded row
    pub seq_len:    usize,
    #[config(default = 8)]
    pub embed_dim:  usize,
    #[config(default = 32)]
    pub hidden_dim: usize,
    #[config(default = 0.2)]
    pub dropout:    f64,
}

impl EmbeddingClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> EmbeddingClassifier<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embed_dim).init(device);
        // Flattened embeddings keep word order: each position has its own weights.
        let hidden    = LinearConfig::new(self.seq_len * self.embed_dim, self.hidden_dim).init(device);
        let output    = LinearConfig::new(self.hidden_dim, NUM_CLASSES).init(device);
        let dropout   = DropoutConfig::new(self.dropout).init();
        EmbeddingClassifier { embedding, hidden, output, dropout }
    }
}

/// Embedding → flatten → dense(ReLU) → dropout → dense(2 logits).
#[derive(Module, Debug)]
pub struct EmbeddingClassifier<B: Backend> {
    pub embedding: Embedding<B>,
    pub hidden:    Linear<B>,
    pub output:    Linear<B>,
    pub dropout:   Dropout,
}

pub struct ClassifierOutput<B: Backend> {
    /// Mean cross-entropy over the batch, shape [1]
    pub loss:   Tensor<B, 1>,
    /// Raw class scores, shape [batch, 2]
    pub logits: Tensor<B, 2>,
}

impl<B: Backend> EmbeddingClassifier<B> {
    /// input_ids: [batch, seq_len] → logits: [batch, 2]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let x = self.embedding.forward(input_ids); // [batch, seq_len, embed_dim]
        let x = x.flatten::<2>(1, 2);              // [batch, seq_len * embed_dim]
        let x = burn::tensor::activation::relu(self.hidden.forward(x));
        self.output.forward(self.dropout.forward(x))
    }

    /// Two-class cross-entropy, equivalent to binary cross-entropy on a
    /// sigmoid output.
    pub fn forward_loss(
        &self,
        input_ids: Tensor<B, 2, Int>,
        labels:    Tensor<B, 1, Int>,
    ) -> ClassifierOutput<B> {
        let logits = self.forward(input_ids);
        let loss   = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), labels);
        ClassifierOutput { loss, logits }
    }

    /// P(successful) per row, shape [batch]
    pub fn probabilities(&self, input_ids: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        let [batch_size, _] = input_ids.dims();
        let probs = burn::tensor::activation::softmax(self.forward(input_ids), 1);
        probs
            .slice([0..batch_size, 1..NUM_CLASSES])
            .reshape([batch_size])
    }

    /// Weight shapes of the embedding, hidden and output layers.
    /// Loading a record never checks these, so callers compare them.
    pub fn weight_shapes(&self) -> [[usize; 2]; 3] {
        [
            self.embedding.weight.val().dims(),
            self.hidden.weight.val().dims(),
            self.output.weight.val().dims(),
        ]
    }
}

/// Number of rows whose argmax class equals the label.
pub fn count_correct<B: Backend>(logits: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> usize {
    // argmax(1) returns [batch, 1]: flatten to [batch] before comparing
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predicted
        .equal(labels)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    correct as usize
}
