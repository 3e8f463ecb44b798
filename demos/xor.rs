use ferrite_backprop::{train_network, Matrix, Network, Sample, Sgd};

fn main() -> ferrite_backprop::Result<()> {
    let mut network = Network::new(&[2, 3, 1])?;

    let samples = vec![
        Sample::new(vec![1.0, 0.0], vec![1.0]),
        Sample::new(vec![1.0, 1.0], vec![0.0]),
        Sample::new(vec![0.0, 1.0], vec![1.0]),
        Sample::new(vec![0.0, 0.0], vec![0.0]),
    ];

    let optimizer = Sgd::new(0.5);
    let epochs = 10000;

    for epoch in 0..epochs {
        let error = train_network(&mut network, &samples, &optimizer)?;
        if epoch % 1000 == 0 {
            println!("Epoch {epoch}: error = {error:.6}");
        }
    }

    for sample in &samples {
        let output = network.predict(&Matrix::column(&sample.input))?;
        println!("Input: {:?} -> Output: {:.4}", sample.input, output.to_vec()[0]);
    }

    Ok(())
}
